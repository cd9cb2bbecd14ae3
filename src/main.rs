use std::io;
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rx_extract::assets::RuntimeLayout;
use rx_extract::report::{self, Report};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scanned prescription to read (raster image or single-page PDF)
    #[arg(value_name = "IMAGE_OR_PDF")]
    input: PathBuf,
}

fn main() {
    // Diagnostics go to stderr; stdout carries exactly one JSON object.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return 0;
        }
        // Usage errors travel on the same JSON channel as pipeline errors.
        Err(err) => return fail(err.into()),
    };

    let extracted =
        RuntimeLayout::discover().and_then(|layout| rx_extract::extract(&cli.input, &layout));

    match extracted {
        Ok(text) => match report::emit(&Report::success(text)) {
            Ok(()) => 0,
            Err(err) => fail(err),
        },
        Err(err) => fail(err),
    }
}

fn fail(err: anyhow::Error) -> i32 {
    if let Err(emit_err) = report::emit(&Report::failure(&err)) {
        tracing::error!("could not emit failure report: {emit_err:#}");
    }
    2
}
