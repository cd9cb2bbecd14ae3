use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing::debug;

/// Directory holding the Tesseract binary and its `tessdata`.
pub const OCR_ASSET: &str = "tesseract";
/// Directory holding the frequency dictionary and the medicine-name list.
pub const DICTIONARY_ASSET: &str = "dictionary";
/// Names the self-extraction directory of a packaged launcher. Optional;
/// consulted as the last candidate root.
pub const BUNDLE_ENV: &str = "RX_EXTRACT_BUNDLE";

/// Resolved locations of the runtime assets. Discovered once at startup
/// and immutable for the rest of the process.
#[derive(Debug, Clone)]
pub struct RuntimeLayout {
    pub ocr_dir: PathBuf,
    pub dict_dir: PathBuf,
}

impl RuntimeLayout {
    /// Resolve both asset directories, failing before any image work
    /// begins if either is missing.
    pub fn discover() -> Result<Self> {
        let layout = RuntimeLayout {
            ocr_dir: locate(OCR_ASSET)?,
            dict_dir: locate(DICTIONARY_ASSET)?,
        };
        debug!(
            ocr_dir = %layout.ocr_dir.display(),
            dict_dir = %layout.dict_dir.display(),
            "resolved runtime layout"
        );
        Ok(layout)
    }
}

/// Find `asset` under the standard candidate roots.
pub fn locate(asset: &str) -> Result<PathBuf> {
    resolve(&candidate_roots(), asset)
        .ok_or_else(|| anyhow!("Resource not found: no {asset} directory in any known location"))
}

/// First `root/asset` that exists as a directory, in priority order.
pub fn resolve(roots: &[PathBuf], asset: &str) -> Option<PathBuf> {
    roots
        .iter()
        .map(|root| root.join(asset))
        .find(|candidate| candidate.is_dir())
}

/// Candidate roots, most specific first:
/// 1. the crate checkout (dev runs),
/// 2. the resources directory above the installed executable,
/// 3. the launcher's self-extraction directory, when advertised.
fn candidate_roots() -> Vec<PathBuf> {
    let mut roots = vec![PathBuf::from(env!("CARGO_MANIFEST_DIR"))];
    if let Ok(exe) = env::current_exe() {
        if let Some(resources) = exe.parent().and_then(Path::parent) {
            roots.push(resources.to_path_buf());
        }
    }
    if let Some(bundle) = env::var_os(BUNDLE_ENV) {
        roots.push(PathBuf::from(bundle));
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_earliest_existing_root() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::create_dir(first.path().join(DICTIONARY_ASSET)).unwrap();
        std::fs::create_dir(second.path().join(DICTIONARY_ASSET)).unwrap();

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let found = resolve(&roots, DICTIONARY_ASSET).unwrap();
        assert_eq!(found, first.path().join(DICTIONARY_ASSET));
    }

    #[test]
    fn resolve_skips_roots_without_the_asset() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::create_dir(second.path().join(OCR_ASSET)).unwrap();

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let found = resolve(&roots, OCR_ASSET).unwrap();
        assert_eq!(found, second.path().join(OCR_ASSET));
    }

    #[test]
    fn resolve_requires_a_directory() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(DICTIONARY_ASSET), "not a dir").unwrap();
        assert!(resolve(&[root.path().to_path_buf()], DICTIONARY_ASSET).is_none());
    }

    #[test]
    fn locate_names_the_missing_asset() {
        let err = locate("definitely-not-bundled").unwrap_err();
        assert!(err.to_string().contains("definitely-not-bundled"));
    }
}
