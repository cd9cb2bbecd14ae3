//! Extract and lexically correct the text of a scanned prescription.
//!
//! The pipeline is strictly linear: locate the runtime assets, load the
//! scan as grayscale, denoise and binarize it, run Tesseract over the
//! result, then spell-correct the recognized text against the pharmacy
//! dictionary. Every run is self-contained; the dictionaries are re-read
//! from disk on each invocation.

pub mod assets;
pub mod correct;
pub mod input;
pub mod ocr;
pub mod preprocess;
pub mod report;

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::assets::RuntimeLayout;
use crate::correct::Dictionaries;
use crate::ocr::TesseractEngine;

/// Run the whole pipeline for one input file, returning the corrected,
/// trimmed text.
pub fn extract(path: &Path, layout: &RuntimeLayout) -> Result<String> {
    let gray = input::load_grayscale(path)?;
    let binarized = preprocess::binarize(&gray);

    let engine = TesseractEngine::new(&layout.ocr_dir);
    let raw = engine.recognize(&binarized)?;
    debug!(chars = raw.len(), "recognized raw text");

    let dictionaries = Dictionaries::load(&layout.dict_dir)?;
    let corrected = correct::correct(&raw, &dictionaries.index);
    Ok(corrected.trim().to_string())
}
