//! imgtopdf - Convert images into a single PDF or PostScript document.
//!
//! Every input image becomes one page of the output document. Inputs can be
//! files, directories or glob patterns; the last argument names the document
//! and its format (`.pdf` or `.ps`).
//!
//! The pipeline:
//!
//! - [`input`] resolves arguments into ordered, unique, decodable images
//! - [`decode`] reads images through the [`ImageDecoder`](decode::ImageDecoder) trait
//! - [`convert`] appends one page per image to a single writer session
//! - [`io`] writes and atomically commits the PDF or PostScript document
//!
//! # Examples
//!
//! ```no_run
//! use imgtopdf::config::RecursionDepth;
//! use imgtopdf::convert::BatchConverter;
//! use imgtopdf::decode::RasterDecoder;
//! use imgtopdf::input::InputResolver;
//! use imgtopdf::io::FileBackend;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let decoder = Arc::new(RasterDecoder::new());
//! let resolved = InputResolver::new(decoder.clone(), RecursionDepth::default())
//!     .resolve(&["scans/", "album.pdf"])?;
//!
//! let converter = BatchConverter::new(decoder, Arc::new(FileBackend::new()));
//! let report = converter
//!     .run(&resolved.inputs, &resolved.output, &Default::default())
//!     .await;
//! println!("exit code {}", report.exit_code().as_i32());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod convert;
pub mod decode;
pub mod error;
pub mod input;
pub mod io;
pub mod output;
pub mod paper;
pub mod utils;

pub use config::Config;
pub use error::{ExitCode, ImgToPdfError, Result};

use std::io::IsTerminal;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::cli::parse_args;
use crate::convert::BatchConverter;
use crate::decode::{ImageDecoder, RasterDecoder};
use crate::input::InputResolver;
use crate::io::{DocumentBackend, FileBackend};
use crate::output::OutputFormatter;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Install the stderr log subscriber.
///
/// Shows warnings, or everything down to debug when `verbose`. Does nothing if
/// a subscriber is already installed.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

/// Run the command line `args` (program name first) with the real decoder
/// and file backends.
pub async fn run<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    run_with(
        args,
        Arc::new(RasterDecoder::new()),
        Arc::new(FileBackend::new()),
    )
    .await
}

/// Run the command line `args` against the given collaborators.
///
/// Returns the most severe exit code encountered.
pub async fn run_with<I, T>(
    args: I,
    decoder: Arc<dyn ImageDecoder>,
    backend: Arc<dyn DocumentBackend>,
) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(ImgToPdfError::Usage) => {
            eprintln!("{}", ImgToPdfError::Usage);
            return ExitCode::ArgumentError;
        }
        Err(err) => {
            eprintln!("{err}");
            return err.exit_code();
        }
    };

    let cli = parsed.cli;
    init_tracing(cli.verbose);
    let formatter = OutputFormatter::new(cli.verbose);

    for flag in &parsed.ignored {
        formatter.warning(&format!("ignoring unknown option '{flag}'"));
    }

    if cli.is_listing() {
        if cli.list_image_formats {
            output::print_image_formats(decoder.as_ref());
        }
        if cli.list_page_sizes {
            output::print_page_sizes();
        }
        return ExitCode::Success;
    }

    match convert_documents(&cli, decoder, backend, &formatter).await {
        Ok(code) => code,
        Err(err) => {
            formatter.error(&err.to_string());
            err.exit_code()
        }
    }
}

/// Resolve inputs and run the batch.
async fn convert_documents(
    cli: &cli::Cli,
    decoder: Arc<dyn ImageDecoder>,
    backend: Arc<dyn DocumentBackend>,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let config = cli.to_config()?;

    let resolved = InputResolver::new(decoder.clone(), config.recursion).resolve(&cli.args)?;
    let target = resolved.output;

    formatter.debug(&format!(
        "Converting {} image(s) into {} ({})",
        resolved.inputs.len(),
        target.path.display(),
        target.format
    ));

    let converter = BatchConverter::new(decoder, backend).with_jobs(config.effective_jobs());
    let report = converter
        .run_with_progress(&resolved.inputs, &target, &config.page, |_, record| {
            output::display_record(formatter, record);
        })
        .await;

    output::display_batch_report(formatter, &report);

    match report.failure {
        Some(err) => Err(err),
        None => Ok(ExitCode::Success),
    }
}
