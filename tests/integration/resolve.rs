//! Input resolution against real files.

use crate::common::*;
use imgtopdf::config::RecursionDepth;
use imgtopdf::decode::RasterDecoder;
use imgtopdf::input::InputResolver;
use imgtopdf::io::OutputFormat;
use imgtopdf::{ExitCode, ImgToPdfError};
use std::sync::Arc;
use tempfile::TempDir;

fn resolver(depth: RecursionDepth) -> InputResolver {
    InputResolver::new(Arc::new(RasterDecoder::new()), depth)
}

#[test]
fn test_literal_and_glob_are_deduplicated() {
    let dir = TempDir::new().unwrap();
    let a = write_png(dir.path(), "a.png", 4, 4);
    let b = write_png(dir.path(), "b.png", 4, 4);
    write_text(dir.path(), "notes.txt");

    let pattern = format!("{}/*.png", dir.path().display());
    let output = arg(&dir.path().join("out.pdf"));
    let resolved = resolver(RecursionDepth::default())
        .resolve(&[arg(&b), pattern, output])
        .unwrap();

    assert_eq!(resolved.inputs, vec![b, a]);
    assert_eq!(resolved.output.format, OutputFormat::Pdf);
}

#[test]
fn test_directory_respects_depth() {
    let dir = TempDir::new().unwrap();
    let top = write_png(dir.path(), "top.png", 2, 2);
    let nested = write_png(dir.path(), "nested/inner.png", 2, 2);
    let args = [arg(dir.path()), "out.ps".to_string()];

    let shallow = resolver(RecursionDepth::Depth(1)).resolve(&args).unwrap();
    assert_eq!(shallow.inputs, vec![top.clone()]);

    let deep = resolver(RecursionDepth::Unlimited).resolve(&args).unwrap();
    assert_eq!(deep.inputs.len(), 2);
    assert!(deep.inputs.contains(&top));
    assert!(deep.inputs.contains(&nested));
    assert_eq!(deep.output.format, OutputFormat::PostScript);
}

#[test]
fn test_zero_depth_ignores_directories() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "top.png", 2, 2);

    let err = resolver(RecursionDepth::Depth(0))
        .resolve(&[arg(dir.path()), "out.pdf".to_string()])
        .unwrap_err();
    assert!(matches!(err, ImgToPdfError::NoInputs));
}

#[test]
fn test_non_images_resolve_to_nothing() {
    let dir = TempDir::new().unwrap();
    let notes = write_text(dir.path(), "notes.txt");
    let output = dir.path().join("out.pdf");

    let err = resolver(RecursionDepth::default())
        .resolve(&[arg(&notes), arg(&output)])
        .unwrap_err();

    assert_eq!(err.exit_code(), ExitCode::ParseFailure);
    assert!(!output.exists());
}

#[test]
fn test_missing_output_is_rejected_first() {
    let err = resolver(RecursionDepth::default())
        .resolve(&["/definitely/not/here.png"])
        .unwrap_err();
    assert!(matches!(err, ImgToPdfError::MissingOutput));
}

#[test]
fn test_parent_components_are_deduplicated() {
    let dir = TempDir::new().unwrap();
    let image = write_gray_png(dir.path(), "gray.png");
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let detour = dir.path().join("sub").join("..").join("gray.png");

    let resolved = resolver(RecursionDepth::default())
        .resolve(&[arg(&image), arg(&detour), "out.pdf".to_string()])
        .unwrap();

    assert_eq!(resolved.inputs, vec![image]);
}

#[test]
fn test_truncated_image_passes_probe() {
    let dir = TempDir::new().unwrap();
    let broken = write_truncated_png(dir.path(), "broken.png");

    let resolved = resolver(RecursionDepth::default())
        .resolve(&[arg(&broken), "out.pdf".to_string()])
        .unwrap();
    assert_eq!(resolved.inputs, vec![broken]);
}
