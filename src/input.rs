use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::GrayImage;
use pdfium_render::prelude::*;
use tracing::debug;

/// Target resolution when rasterizing a PDF page. PDF points are 72/inch.
const PDF_RENDER_DPI: f32 = 300.0;

/// Load `path` as a single-channel raster. PDFs are rendered (first page
/// only); everything else is decoded directly.
pub fn load_grayscale(path: &Path) -> Result<GrayImage> {
    if is_pdf(path) {
        render_pdf_page(path)
    } else {
        let img = image::open(path)
            .with_context(|| format!("Could not read file: {}", path.display()))?;
        Ok(img.to_luma8())
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Render the first page of a PDF to grayscale via pdfium.
///
/// A bundled pdfium library next to the executable wins over the system
/// one; neither being present degrades PDF support only.
fn render_pdf_page(path: &Path) -> Result<GrayImage> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
        &executable_dir(),
    ))
    .or_else(|_| Pdfium::bind_to_system_library())
    .context("PDF renderer unavailable: pdfium library not found")?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium
        .load_pdf_from_file(path, None)
        .with_context(|| format!("Could not read file: {}", path.display()))?;
    let pages = document.pages();
    if pages.len() == 0 {
        bail!("Empty PDF: {}", path.display());
    }

    let page = pages.get(0).context("Failed to open first PDF page")?;
    let scale = PDF_RENDER_DPI / 72.0;
    let width = (page.width().value * scale) as i32;
    let height = (page.height().value * scale) as i32;
    debug!(width, height, "rasterizing PDF page 1");

    let bitmap = page
        .render_with_config(
            &PdfRenderConfig::new()
                .set_target_width(width)
                .set_target_height(height),
        )
        .context("Failed to render PDF page")?;

    Ok(bitmap.as_image().to_luma8())
}

fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_errors_with_path() {
        let err = load_grayscale(Path::new("/no/such/scan.png")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Could not read file"));
        assert!(msg.contains("/no/such/scan.png"));
    }

    #[test]
    fn corrupt_file_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        let err = load_grayscale(&path).unwrap_err();
        assert!(err.to_string().contains("broken.png"));
    }

    #[test]
    fn decodes_rgb_to_single_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        let rgb = image::RgbImage::from_pixel(4, 3, image::Rgb([200, 10, 10]));
        rgb.save(&path).unwrap();

        let gray = load_grayscale(&path).unwrap();
        assert_eq!(gray.dimensions(), (4, 3));
    }

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert!(is_pdf(Path::new("scan.pdf")));
        assert!(is_pdf(Path::new("scan.PDF")));
        assert!(!is_pdf(Path::new("scan.png")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    // Outcome depends on whether the host has a pdfium library.
    #[test]
    #[ignore]
    fn pdf_path_reports_renderer_or_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let err = load_grayscale(&path).unwrap_err();
        let chain = format!("{err:#}");
        assert!(
            chain.contains("PDF renderer unavailable") || chain.contains("Could not read file")
        );
    }
}
