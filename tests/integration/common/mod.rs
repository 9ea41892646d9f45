//! Integration tests for imgtopdf.
//!
//! Fixture images are generated into temporary directories with the `image`
//! crate, so no binary fixtures are checked in.

#![allow(dead_code)]

use image::{GrayImage, RgbImage};
use std::path::{Path, PathBuf};

/// Write a solid RGB PNG.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]))
        .save(&path)
        .expect("Failed to write PNG fixture");
    path
}

/// Write an 8-bit grayscale PNG.
pub fn write_gray_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    GrayImage::from_pixel(3, 3, image::Luma([90]))
        .save(&path)
        .expect("Failed to write gray fixture");
    path
}

/// Write a one-bit plain PBM bitmap.
pub fn write_bitmap(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"P1\n4 2\n0 1 0 1\n1 0 1 0\n").expect("Failed to write PBM fixture");
    path
}

/// Write a file that is not an image.
pub fn write_text(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, "just some notes\n").expect("Failed to write text fixture");
    path
}

/// Write a PNG whose header is valid but whose pixel data is cut off.
///
/// The pixels are noise so the compressed data spans many bytes and the cut
/// lands inside it.
pub fn write_truncated_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut state: u32 = 0x2545_f491;
    RgbImage::from_fn(64, 64, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        image::Rgb([r, g, b])
    })
    .save(&path)
    .expect("Failed to write PNG fixture");
    let bytes = std::fs::read(&path).expect("Failed to read fixture");
    std::fs::write(&path, &bytes[..bytes.len() / 2]).expect("Failed to truncate fixture");
    path
}

/// Path argument as the CLI would receive it.
pub fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Number of pages in a PDF on disk.
pub fn pdf_page_count(path: &Path) -> usize {
    lopdf::Document::load(path)
        .expect("Failed to load output PDF")
        .get_pages()
        .len()
}

/// Number of directory entries, to detect stray temporary files.
pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("Failed to list directory").count()
}
