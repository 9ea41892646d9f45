//! End-to-end batches writing real documents.

use crate::common::*;
use imgtopdf::config::{Orientation, PageSpecDefaults};
use imgtopdf::convert::{BatchConverter, BatchState, ConversionOutcome, PageSpec};
use imgtopdf::decode::{DecodedImage, RasterDecoder};
use imgtopdf::io::{
    DocumentBackend, FileBackend, OutputTarget, PagedDocumentWriter, WriteStatistics,
};
use imgtopdf::{ExitCode, ImgToPdfError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn converter(jobs: usize) -> BatchConverter {
    BatchConverter::new(Arc::new(RasterDecoder::new()), Arc::new(FileBackend::new()))
        .with_jobs(jobs)
}

fn target(path: PathBuf) -> OutputTarget {
    OutputTarget::from_argument(&path.to_string_lossy()).unwrap()
}

#[tokio::test]
async fn test_pdf_one_page_per_image() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_png(dir.path(), "one.png", 8, 6),
        write_gray_png(dir.path(), "two.png"),
        write_bitmap(dir.path(), "three.pbm"),
    ];
    let output = dir.path().join("album.pdf");

    let report = converter(4)
        .run(&inputs, &target(output.clone()), &PageSpecDefaults::default())
        .await;

    assert!(report.is_success(), "{:?}", report.failure);
    assert_eq!(report.state, BatchState::Closed);
    assert_eq!(report.exit_code(), ExitCode::Success);
    assert_eq!(pdf_page_count(&output), 3);

    let order: Vec<_> = report.records.iter().map(|r| r.path.clone()).collect();
    assert_eq!(order, inputs);
}

#[tokio::test]
async fn test_undecodable_image_is_skipped() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_png(dir.path(), "a.png", 4, 4),
        write_truncated_png(dir.path(), "b.png"),
        write_png(dir.path(), "c.png", 4, 4),
    ];
    let output = dir.path().join("out.pdf");

    let report = converter(2)
        .run(&inputs, &target(output.clone()), &PageSpecDefaults::default())
        .await;

    assert_eq!(report.exit_code(), ExitCode::Success);
    assert_eq!(report.rendered(), 2);
    assert_eq!(report.skipped(), 1);
    assert!(matches!(
        report.records[1].outcome,
        ConversionOutcome::DecodeFailed { .. }
    ));
    assert_eq!(pdf_page_count(&output), 2);
}

#[tokio::test]
async fn test_nothing_decodable_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![write_truncated_png(dir.path(), "broken.png")];
    let output = dir.path().join("out.pdf");

    let report = converter(1)
        .run(&inputs, &target(output.clone()), &PageSpecDefaults::default())
        .await;

    assert!(matches!(report.failure, Some(ImgToPdfError::NoInputs)));
    assert_eq!(report.state, BatchState::Aborted);
    assert!(!output.exists());
    assert_eq!(entry_count(dir.path()), 1);
}

#[tokio::test]
async fn test_postscript_output() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_png(dir.path(), "a.png", 3, 2),
        write_gray_png(dir.path(), "b.png"),
    ];
    let output = dir.path().join("out.ps");
    let defaults = PageSpecDefaults {
        orientation: Orientation::Portrait,
        ..PageSpecDefaults::default()
    };

    let report = converter(2)
        .run(&inputs, &target(output.clone()), &defaults)
        .await;
    assert!(report.is_success(), "{:?}", report.failure);

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("%!PS-Adobe-3.0"));
    assert!(text.contains("%%Page: 2 2"));
    assert!(text.contains("%%Pages: 2"));
    assert!(text.contains("colorimage"));
    assert!(text.trim_end().ends_with("%%EOF"));
}

#[tokio::test]
async fn test_unwritable_output_directory() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![write_png(dir.path(), "a.png", 2, 2)];
    let output = dir.path().join("missing").join("out.pdf");

    let report = converter(1)
        .run(&inputs, &target(output.clone()), &PageSpecDefaults::default())
        .await;

    assert_eq!(report.state, BatchState::Idle);
    assert_eq!(report.exit_code(), ExitCode::FileFailure);
    assert!(report.records.is_empty());
}

/// Real PDF backend whose writer refuses to draw a given page.
struct FailOnPage {
    page: usize,
}

struct FailingWriter {
    inner: Box<dyn PagedDocumentWriter>,
    fail_on: usize,
    begun: usize,
}

impl PagedDocumentWriter for FailingWriter {
    fn begin_page(&mut self, spec: &PageSpec) -> Result<()> {
        self.begun += 1;
        self.inner.begin_page(spec)
    }

    fn draw_image(&mut self, image: &DecodedImage) -> Result<()> {
        if self.begun == self.fail_on {
            return Err(ImgToPdfError::page_failed(
                image.path().to_path_buf(),
                "device rejected image",
            ));
        }
        self.inner.draw_image(image)
    }

    fn end_page(&mut self) -> Result<()> {
        self.inner.end_page()
    }

    fn pages(&self) -> usize {
        self.inner.pages()
    }

    fn finish(self: Box<Self>) -> Result<WriteStatistics> {
        self.inner.finish()
    }

    fn abort(self: Box<Self>) {
        self.inner.abort()
    }
}

impl DocumentBackend for FailOnPage {
    fn open(&self, target: &OutputTarget) -> Result<Box<dyn PagedDocumentWriter>> {
        Ok(Box::new(FailingWriter {
            inner: FileBackend::new().open(target)?,
            fail_on: self.page,
            begun: 0,
        }))
    }
}

#[tokio::test]
async fn test_page_failure_aborts_whole_document() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_png(dir.path(), "a.png", 2, 2),
        write_png(dir.path(), "b.png", 2, 2),
        write_png(dir.path(), "c.png", 2, 2),
    ];
    let output = dir.path().join("out.pdf");

    let converter = BatchConverter::new(
        Arc::new(RasterDecoder::new()),
        Arc::new(FailOnPage { page: 2 }),
    )
    .with_jobs(3);
    let report = converter
        .run(&inputs, &target(output.clone()), &PageSpecDefaults::default())
        .await;

    assert_eq!(report.state, BatchState::Aborted);
    assert_eq!(report.exit_code(), ExitCode::FileFailure);
    assert!(matches!(
        report.failure,
        Some(ImgToPdfError::PageFailed { .. })
    ));
    assert_eq!(report.records.len(), 2);
    assert!(!output.exists());
    assert_eq!(entry_count(dir.path()), 3);
}
