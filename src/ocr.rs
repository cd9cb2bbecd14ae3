use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use image::GrayImage;
use tracing::debug;

#[cfg(windows)]
const TESSERACT_BINARY: &str = "tesseract.exe";
#[cfg(not(windows))]
const TESSERACT_BINARY: &str = "tesseract";

/// Adapter around the bundled Tesseract toolchain.
///
/// Built explicitly from the located asset directory; the language-data
/// location travels on each child invocation's environment instead of
/// mutating the process's own.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    tessdata: PathBuf,
}

impl TesseractEngine {
    pub fn new(ocr_dir: &Path) -> Self {
        TesseractEngine {
            binary: ocr_dir.join(TESSERACT_BINARY),
            tessdata: ocr_dir.join("tessdata"),
        }
    }

    /// Recognize a binarized raster as a single uniform block of text
    /// using the LSTM engine only. An empty result is not an error.
    pub fn recognize(&self, image: &GrayImage) -> Result<String> {
        let workdir = tempfile::TempDir::with_prefix("rx-extract")
            .context("Failed to create OCR scratch directory")?;
        let input = workdir.path().join("input.png");
        let output_base = workdir.path().join("output");

        image
            .save(&input)
            .context("Failed to write OCR input image")?;

        debug!(binary = %self.binary.display(), "invoking tesseract");
        let output = Command::new(&self.binary)
            .arg(&input)
            .arg(&output_base)
            .args(["--oem", "1", "--psm", "6"])
            .env("TESSDATA_PREFIX", &self.tessdata)
            .output()
            .with_context(|| format!("Failed to run {}", self.binary.display()))?;
        if !output.status.success() {
            bail!(
                "Tesseract failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        fs::read_to_string(output_base.with_extension("txt"))
            .context("Failed to read Tesseract output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn engine_paths_follow_the_asset_layout() {
        let engine = TesseractEngine::new(Path::new("/opt/rx/tesseract"));
        assert_eq!(
            engine.binary,
            Path::new("/opt/rx/tesseract").join(TESSERACT_BINARY)
        );
        assert_eq!(engine.tessdata, Path::new("/opt/rx/tesseract/tessdata"));
    }

    #[test]
    fn missing_binary_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = TesseractEngine::new(dir.path());
        let blank = GrayImage::from_pixel(8, 8, Luma([255u8]));

        let err = engine.recognize(&blank).unwrap_err();
        assert!(err.to_string().contains("Failed to run"));
    }
}
