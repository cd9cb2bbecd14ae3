use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use symspell::{SymSpell, SymSpellBuilder, UnicodeStringStrategy, Verbosity};
use tracing::{debug, warn};

/// Frequency dictionary: `term<TAB>count` per line.
pub const FREQUENCY_DICT: &str = "pharmacy_dict.txt";
/// Known medicine names, one lowercase term per line.
pub const MEDICINE_DICT: &str = "medicine_names.txt";

const MAX_EDIT_DISTANCE: i64 = 1;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+|\W+").unwrap());

// Dosage amounts like "500mg", "10 ml" or a bare unit. Matched against
// whole tokens only.
static UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d*\s*(?:mg|g|ml)$").unwrap());

/// Symmetric-delete index over the pharmacy frequency dictionary.
pub struct SpellingIndex {
    sym: SymSpell<UnicodeStringStrategy>,
}

impl std::fmt::Debug for SpellingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpellingIndex").finish_non_exhaustive()
    }
}

impl SpellingIndex {
    /// Build the index fresh from `path`. Nothing is cached across
    /// invocations.
    pub fn load(path: &Path) -> Result<Self> {
        let mut sym: SymSpell<UnicodeStringStrategy> = SymSpellBuilder::default()
            .max_dictionary_edit_distance(MAX_EDIT_DISTANCE)
            .prefix_length(7)
            .count_threshold(1)
            .build()
            .map_err(|err| anyhow!("Failed to configure spelling index: {err}"))?;

        let corpus = path
            .to_str()
            .ok_or_else(|| anyhow!("Dictionary path is not valid UTF-8: {}", path.display()))?;
        if !sym.load_dictionary(corpus, 0, 1, "\t") {
            return Err(anyhow!(
                "Failed to load frequency dictionary: {}",
                path.display()
            ));
        }
        Ok(SpellingIndex { sym })
    }

    /// Closest dictionary term within the edit-distance bound, if any.
    /// Ranking among equally close candidates is the index's own
    /// (corpus frequency, then lexical order).
    fn best_match(&self, token: &str) -> Option<String> {
        self.sym
            .lookup(token, Verbosity::Top, MAX_EDIT_DISTANCE)
            .into_iter()
            .next()
            .map(|suggestion| suggestion.term)
    }
}

/// Everything the corrector reads from the dictionary directory.
#[derive(Debug)]
pub struct Dictionaries {
    pub index: SpellingIndex,
    /// Known medicine names, kept for the deferred dosage-parsing
    /// extension; plain spelling correction does not consult it yet.
    pub medicine_names: HashSet<String>,
}

impl Dictionaries {
    pub fn load(dict_dir: &Path) -> Result<Self> {
        let index = SpellingIndex::load(&dict_dir.join(FREQUENCY_DICT))?;
        let medicine_names = load_medicine_names(&dict_dir.join(MEDICINE_DICT))?;
        debug!(medicine_names = medicine_names.len(), "dictionaries loaded");
        Ok(Dictionaries {
            index,
            medicine_names,
        })
    }
}

fn load_medicine_names(path: &Path) -> Result<HashSet<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_lowercase)
            .collect()),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!("medicine name list missing: {}", path.display());
            Ok(HashSet::new())
        }
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Split into alternating word / non-word runs. Every input character
/// lands in exactly one token, so the tokens rejoin losslessly.
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Correct recognized text token by token, preserving layout verbatim.
pub fn correct(text: &str, index: &SpellingIndex) -> String {
    tokenize(text)
        .into_iter()
        .map(|token| correct_token(token, index))
        .collect()
}

fn correct_token(token: &str, index: &SpellingIndex) -> String {
    if UNIT_RE.is_match(token) {
        // Dosage amounts must survive untouched.
        token.to_string()
    } else if !token.is_empty() && token.chars().all(char::is_alphabetic) {
        index.best_match(token).unwrap_or_else(|| token.to_string())
    } else {
        token.to_string()
    }
}
