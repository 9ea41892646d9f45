//! Image decoding.
//!
//! The converter talks to image codecs only through the [`ImageDecoder`]
//! trait: a cheap header [`probe`](ImageDecoder::probe) used while resolving
//! inputs, and a full [`load`](ImageDecoder::load) used once per page.
//!
//! # Examples
//!
//! ```no_run
//! use imgtopdf::decode::{ImageDecoder, RasterDecoder};
//! use std::path::Path;
//!
//! let decoder = RasterDecoder::new();
//! if decoder.probe(Path::new("scan.png")) {
//!     let image = decoder.load(Path::new("scan.png")).unwrap();
//!     println!("{}x{} {:?}", image.width(), image.height(), image.native_format());
//! }
//! ```

pub mod raster;

pub use raster::RasterDecoder;

use image::DynamicImage;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Native pixel format of a decoded image, as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One bit per pixel.
    Monochrome,
    /// Multi-level gray, with or without alpha.
    Grayscale,
    /// Anything with colour channels.
    Color,
}

impl PixelFormat {
    /// Whether the image is stored one bit per pixel.
    pub fn is_monochrome(self) -> bool {
        self == Self::Monochrome
    }
}

/// A fully decoded image ready to be drawn on a page.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    path: PathBuf,
    native_format: PixelFormat,
    pixels: DynamicImage,
}

impl DecodedImage {
    /// Wrap decoded pixels.
    pub fn new(path: PathBuf, native_format: PixelFormat, pixels: DynamicImage) -> Self {
        Self {
            path,
            native_format,
            pixels,
        }
    }

    /// Source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pixel format the file stores.
    pub fn native_format(&self) -> PixelFormat {
        self.native_format
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Samples as packed 8-bit RGB, row-major, alpha discarded.
    pub fn rgb8(&self) -> Vec<u8> {
        self.pixels.to_rgb8().into_raw()
    }

    /// Samples as 8-bit luma, row-major, alpha discarded.
    pub fn luma8(&self) -> Vec<u8> {
        self.pixels.to_luma8().into_raw()
    }
}

/// Collaborator that sniffs and decodes image files.
pub trait ImageDecoder: Send + Sync {
    /// Whether `path` looks decodable, judged from its header only.
    ///
    /// Never fails: unreadable or malformed files yield `false`.
    fn probe(&self, path: &Path) -> bool;

    /// Decode the whole image.
    ///
    /// # Errors
    ///
    /// Returns [`ImgToPdfError::FailedToDecode`](crate::ImgToPdfError::FailedToDecode)
    /// naming `path` when the file is unreadable, malformed, or unsupported.
    fn load(&self, path: &Path) -> Result<DecodedImage>;

    /// File extensions this decoder can read, sorted and unique.
    fn supported_formats(&self) -> Vec<String>;
}
