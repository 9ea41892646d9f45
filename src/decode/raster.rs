//! [`ImageDecoder`] backed by the `image` crate.

use image::{DynamicImage, ExtendedColorType, ImageDecoder as _, ImageFormat, ImageReader};
use std::path::Path;
use tracing::debug;

use super::{DecodedImage, ImageDecoder, PixelFormat};
use crate::error::{ImgToPdfError, Result};

/// Decoder for every raster format the `image` crate can read.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl RasterDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self
    }
}

impl PixelFormat {
    /// Classify a codec's native colour type.
    pub fn from_color_type(color: ExtendedColorType) -> Self {
        match color {
            ExtendedColorType::L1 | ExtendedColorType::La1 => Self::Monochrome,
            ExtendedColorType::L2
            | ExtendedColorType::La2
            | ExtendedColorType::L4
            | ExtendedColorType::La4
            | ExtendedColorType::L8
            | ExtendedColorType::La8
            | ExtendedColorType::L16
            | ExtendedColorType::La16 => Self::Grayscale,
            _ => Self::Color,
        }
    }
}

impl ImageDecoder for RasterDecoder {
    fn probe(&self, path: &Path) -> bool {
        let Ok(reader) = ImageReader::open(path) else {
            return false;
        };
        let Ok(reader) = reader.with_guessed_format() else {
            return false;
        };
        if reader.format().is_none() {
            return false;
        }

        // Reads the header only.
        match reader.into_dimensions() {
            Ok(_) => true,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "probe rejected file");
                false
            }
        }
    }

    fn load(&self, path: &Path) -> Result<DecodedImage> {
        let fail = |reason: String| ImgToPdfError::failed_to_decode(path.to_path_buf(), reason);

        let reader = ImageReader::open(path)
            .map_err(|e| fail(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| fail(e.to_string()))?;

        if reader.format().is_none() {
            return Err(fail("unrecognized image format".to_string()));
        }

        let decoder = reader.into_decoder().map_err(|e| fail(e.to_string()))?;
        let native_format = PixelFormat::from_color_type(decoder.original_color_type());
        let pixels = DynamicImage::from_decoder(decoder).map_err(|e| fail(e.to_string()))?;

        debug!(
            path = %path.display(),
            width = pixels.width(),
            height = pixels.height(),
            ?native_format,
            "decoded image"
        );

        Ok(DecodedImage::new(path.to_path_buf(), native_format, pixels))
    }

    fn supported_formats(&self) -> Vec<String> {
        let mut formats: Vec<String> = ImageFormat::all()
            .filter(|format| format.reading_enabled())
            .flat_map(|format| format.extensions_str().iter())
            .map(|ext| ext.to_string())
            .collect();

        formats.sort_unstable();
        formats.dedup();
        formats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();
        path
    }

    fn write_pbm(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"P1\n2 2\n0 1\n1 0\n").unwrap();
        path
    }

    #[test]
    fn test_probe_accepts_image() {
        let dir = TempDir::new().unwrap();
        let png = write_png(&dir, "a.png");
        assert!(RasterDecoder::new().probe(&png));
    }

    #[test]
    fn test_probe_ignores_extension() {
        let dir = TempDir::new().unwrap();
        let png = write_png(&dir, "a.png");
        let renamed = dir.path().join("picture.dat");
        std::fs::rename(&png, &renamed).unwrap();

        assert!(RasterDecoder::new().probe(&renamed));
    }

    #[test]
    fn test_probe_rejects_text_and_missing() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, "hello").unwrap();

        let decoder = RasterDecoder::new();
        assert!(!decoder.probe(&txt));
        assert!(!decoder.probe(&dir.path().join("missing.png")));
        assert!(!decoder.probe(dir.path()));
    }

    #[test]
    fn test_load_color_png() {
        let dir = TempDir::new().unwrap();
        let png = write_png(&dir, "a.png");

        let decoded = RasterDecoder::new().load(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
        assert_eq!(decoded.native_format(), PixelFormat::Color);
    }

    #[test]
    fn test_load_gray_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("g.png");
        GrayImage::from_pixel(2, 2, image::Luma([128])).save(&path).unwrap();

        let decoded = RasterDecoder::new().load(&path).unwrap();
        assert_eq!(decoded.native_format(), PixelFormat::Grayscale);
    }

    #[test]
    fn test_load_bitmap_is_monochrome() {
        let dir = TempDir::new().unwrap();
        let pbm = write_pbm(&dir, "mono.pbm");

        let decoded = RasterDecoder::new().load(&pbm).unwrap();
        assert!(decoded.native_format().is_monochrome());
    }

    #[test]
    fn test_load_truncated_file_fails_with_path() {
        let dir = TempDir::new().unwrap();
        let png = write_png(&dir, "a.png");
        let bytes = std::fs::read(&png).unwrap();
        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, &bytes[..bytes.len() / 2]).unwrap();

        let err = RasterDecoder::new().load(&broken).unwrap_err();
        assert!(matches!(err, ImgToPdfError::FailedToDecode { ref path, .. } if path == &broken));
    }

    #[test]
    fn test_supported_formats_sorted() {
        let formats = RasterDecoder::new().supported_formats();
        assert!(formats.contains(&"png".to_string()));
        assert!(formats.contains(&"jpg".to_string()));

        let mut sorted = formats.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(formats, sorted);
    }

    #[test]
    fn test_color_type_classification() {
        assert_eq!(
            PixelFormat::from_color_type(ExtendedColorType::L1),
            PixelFormat::Monochrome
        );
        assert_eq!(
            PixelFormat::from_color_type(ExtendedColorType::L8),
            PixelFormat::Grayscale
        );
        assert_eq!(
            PixelFormat::from_color_type(ExtendedColorType::Rgba8),
            PixelFormat::Color
        );
    }
}
