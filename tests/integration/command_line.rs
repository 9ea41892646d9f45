//! Whole command lines through `run_with`.

use crate::common::*;
use imgtopdf::ExitCode;
use imgtopdf::decode::RasterDecoder;
use imgtopdf::io::FileBackend;
use serial_test::serial;
use std::sync::Arc;
use tempfile::TempDir;

async fn run(args: &[&str]) -> ExitCode {
    let argv = std::iter::once("imgtopdf").chain(args.iter().copied());
    imgtopdf::run_with(
        argv,
        Arc::new(RasterDecoder::new()),
        Arc::new(FileBackend::new()),
    )
    .await
}

#[tokio::test]
async fn test_no_arguments_prints_usage() {
    assert_eq!(run(&[]).await, ExitCode::ArgumentError);
}

#[tokio::test]
async fn test_help_is_an_argument_error() {
    assert_eq!(run(&["--help"]).await, ExitCode::ArgumentError);
}

#[tokio::test]
async fn test_missing_output_argument() {
    let dir = TempDir::new().unwrap();
    let image = write_png(dir.path(), "a.png", 2, 2);
    assert_eq!(run(&[arg(&image).as_str()]).await, ExitCode::ArgumentError);
}

#[tokio::test]
async fn test_listings_succeed() {
    assert_eq!(run(&["--list-page-sizes"]).await, ExitCode::Success);
    assert_eq!(run(&["--list-image-formats"]).await, ExitCode::Success);
}

#[tokio::test]
async fn test_no_images_found() {
    let dir = TempDir::new().unwrap();
    let notes = write_text(dir.path(), "notes.txt");
    let output = dir.path().join("out.pdf");

    let code = run(&[arg(&notes).as_str(), arg(&output).as_str()]).await;
    assert_eq!(code, ExitCode::ParseFailure);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_converts_directory_with_options() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "a.png", 4, 3);
    write_png(dir.path(), "b.png", 3, 4);
    let output = dir.path().join("out").join("scans.pdf");
    std::fs::create_dir(output.parent().unwrap()).unwrap();

    let code = run(&[
        "--page-size",
        "Letter",
        "--orientation",
        "portrait",
        "--unknown-flag",
        "-j",
        "2",
        arg(dir.path()).as_str(),
        arg(&output).as_str(),
    ])
    .await;

    assert_eq!(code, ExitCode::Success);
    assert_eq!(pdf_page_count(&output), 2);
}

#[tokio::test]
async fn test_invalid_page_size() {
    let dir = TempDir::new().unwrap();
    let image = write_png(dir.path(), "a.png", 2, 2);
    let output = dir.path().join("out.pdf");

    let code = run(&["--page-size", "Napkin", arg(&image).as_str(), arg(&output).as_str()]).await;
    assert_eq!(code, ExitCode::ArgumentError);
    assert!(!output.exists());
}

#[tokio::test]
#[serial]
async fn test_dashed_input_after_double_dash() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "-scan.png", 2, 2);

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let code = run(&["--", "-scan.png", "out.pdf"]).await;
    std::env::set_current_dir(previous).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(pdf_page_count(&dir.path().join("out.pdf")), 1);
}
