use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

/// Wire shape of the one JSON object this process prints.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Success { text: String },
    Failure { error: String, trace: String },
}

impl Report {
    pub fn success(text: String) -> Self {
        Report::Success { text }
    }

    /// Failure carries the top-level message plus the full context chain.
    pub fn failure(err: &anyhow::Error) -> Self {
        Report::Failure {
            error: err.to_string(),
            trace: format!("{err:?}"),
        }
    }
}

/// Write the report as a single line on stdout and flush.
///
/// Nothing else in the process writes to stdout; the caller (CLI or the
/// desktop UI wrapping this binary) reads exactly one JSON object per run.
pub fn emit(report: &Report) -> Result<()> {
    let line = serde_json::to_string(report).context("Failed to serialize report")?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(line.as_bytes())
        .context("Failed to write report")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}
