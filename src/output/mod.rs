//! User-facing output for imgtopdf.
//!
//! This module handles everything printed for the user:
//! - Formatted status, warning and error messages
//! - The `--list-page-sizes` and `--list-image-formats` listings
//! - Per-file progress and the batch summary

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::convert::{BatchReport, ConversionOutcome, ConversionRecord};
use crate::decode::ImageDecoder;
use crate::paper::PaperCatalog;

/// Lines of the page size listing, sorted by name.
pub fn page_size_lines() -> Vec<String> {
    PaperCatalog::all().map(PaperCatalog::describe).collect()
}

/// Print every catalog entry, one per line.
pub fn print_page_sizes() {
    for line in page_size_lines() {
        println!("{line}");
    }
}

/// Print every readable image format of `decoder`, one per line.
pub fn print_image_formats(decoder: &dyn ImageDecoder) {
    for format in decoder.supported_formats() {
        println!("{format}");
    }
}

/// The line printed for one settled input, if any.
///
/// Pages and skips are progress, shown on stdout in verbose mode only; the
/// batch summary counts skips either way. Page failures end the batch and are
/// reported with its failure.
pub fn record_line(record: &ConversionRecord) -> Option<String> {
    let path = record.path.display();
    match &record.outcome {
        ConversionOutcome::Rendered { page, .. } => Some(format!("Page {page}: {path}")),
        ConversionOutcome::DecodeFailed { reason } => {
            Some(format!("Skipped {path}: could not load image ({reason})"))
        }
        ConversionOutcome::PageFailed { .. } => None,
    }
}

/// Report one settled input.
pub fn display_record(formatter: &OutputFormatter, record: &ConversionRecord) {
    if let Some(line) = record_line(record) {
        formatter.debug(&line);
    }
}

/// Summary line of a committed batch.
pub fn summary_line(report: &BatchReport) -> Option<String> {
    let stats = report.statistics.as_ref()?;
    let mut line = format!(
        "Converted {} of {} image(s) into {}",
        report.rendered(),
        report.total_inputs,
        stats.output_path.display()
    );
    if report.skipped() > 0 {
        line.push_str(&format!(" ({} skipped)", report.skipped()));
    }
    Some(line)
}

/// Display the outcome of a batch.
pub fn display_batch_report(formatter: &OutputFormatter, report: &BatchReport) {
    if let Some(line) = summary_line(report) {
        if report.skipped() > 0 {
            formatter.info(&line);
        } else {
            formatter.success(&line);
        }
    }

    if let Some(stats) = &report.statistics {
        formatter.detail("Pages", &stats.pages.to_string());
        formatter.detail("Output size", &stats.format_file_size());
        formatter.detail("Time", &format!("{:.2}s", report.elapsed.as_secs_f64()));
    }
}
