use image::GrayImage;
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::median_filter;
use tracing::debug;

/// Denoise and binarize a grayscale raster for OCR.
///
/// A 3x3 median suppresses scanner speckle, then Otsu picks the global
/// cutoff separating ink from paper. Pixels above the cutoff become 255,
/// the rest 0.
pub fn binarize(gray: &GrayImage) -> GrayImage {
    let denoised = median_filter(gray, 1, 1);
    let level = otsu_level(&denoised);
    debug!(level, "binarizing at Otsu threshold");
    threshold(&denoised, level, ThresholdType::Binary)
}
