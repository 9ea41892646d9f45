//! One image, one page.
//!
//! A [`ConversionJob`] decodes a single input, derives its [`PageSpec`] and
//! appends it to the shared document. Decoding and appending are separate
//! steps so the batch can decode on worker threads and append in order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Orientation, PageSpecDefaults};
use crate::decode::{DecodedImage, ImageDecoder, PixelFormat};
use crate::error::{ImgToPdfError, Result};
use crate::io::PagedDocumentWriter;
use crate::paper::{PaperSize, mm_to_points};

/// Colour model a page is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Full colour samples.
    Color,
    /// Gray samples.
    GrayScale,
}

impl ColorMode {
    /// Gray for one-bit images, colour for everything else.
    pub fn for_pixel_format(format: PixelFormat) -> Self {
        if format.is_monochrome() {
            Self::GrayScale
        } else {
            Self::Color
        }
    }
}

/// Fully resolved settings for one page.
///
/// Built fresh for every image from the run's [`PageSpecDefaults`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpec {
    /// Paper size.
    pub paper_size: PaperSize,
    /// Portrait `(width, height)` of the paper in millimetres.
    pub paper_mm: (f64, f64),
    /// Page orientation.
    pub orientation: Orientation,
    /// Colour model for this page.
    pub color_mode: ColorMode,
    /// Pixels per inch used to size the image.
    pub resolution_dpi: u32,
}

impl PageSpec {
    /// Combine the run defaults with a per-image colour mode.
    ///
    /// # Errors
    ///
    /// Returns [`ImgToPdfError::InvalidConfig`] when the paper has no
    /// dimensions, i.e. `Custom` without a custom size.
    pub fn new(defaults: &PageSpecDefaults, color_mode: ColorMode) -> Result<Self> {
        let paper_mm = defaults.paper_mm().ok_or_else(|| {
            ImgToPdfError::invalid_config(format!(
                "Page size {} has no dimensions",
                defaults.paper_size
            ))
        })?;

        Ok(Self {
            paper_size: defaults.paper_size,
            paper_mm,
            orientation: defaults.orientation,
            color_mode,
            resolution_dpi: defaults.resolution_dpi,
        })
    }

    /// Page `(width, height)` in PostScript points, orientation applied.
    pub fn page_size_points(&self) -> (f64, f64) {
        let (a, b) = self.paper_mm;
        let (short, long) = if a <= b { (a, b) } else { (b, a) };

        let (w, h) = match self.orientation {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        };
        (mm_to_points(w), mm_to_points(h))
    }

    /// Size in points of a `width` x `height` pixel image at this resolution.
    pub fn image_size_points(&self, width: u32, height: u32) -> (f64, f64) {
        let scale = 72.0 / f64::from(self.resolution_dpi);
        (f64::from(width) * scale, f64::from(height) * scale)
    }
}

/// What happened to one input.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    /// The image became page number `page` (1-based).
    Rendered {
        /// Page number in the output document.
        page: usize,
        /// Colour model the page was written with.
        color_mode: ColorMode,
    },
    /// The image could not be decoded and was skipped.
    DecodeFailed {
        /// Decoder message.
        reason: String,
    },
    /// The writer rejected the page; the batch stopped here.
    PageFailed {
        /// Writer message.
        reason: String,
    },
}

impl ConversionOutcome {
    /// Whether a page was produced.
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

/// Outcome for a named input.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRecord {
    /// Input path.
    pub path: PathBuf,
    /// What happened to it.
    pub outcome: ConversionOutcome,
}

/// Converts one input image into one page.
pub struct ConversionJob {
    decoder: Arc<dyn ImageDecoder>,
    defaults: PageSpecDefaults,
}

impl ConversionJob {
    /// Create a job runner sharing `decoder` and the run's page defaults.
    pub fn new(decoder: Arc<dyn ImageDecoder>, defaults: PageSpecDefaults) -> Self {
        Self { decoder, defaults }
    }

    /// Decode `input`.
    ///
    /// Safe to call from any thread; touches no shared state.
    pub fn decode(&self, input: &Path) -> Result<DecodedImage> {
        self.decoder.load(input)
    }

    /// Append `image` as the next page of `writer`.
    ///
    /// Any writer failure is reported as [`ImgToPdfError::PageFailed`] naming
    /// the input.
    pub fn append(
        &self,
        image: &DecodedImage,
        writer: &mut dyn PagedDocumentWriter,
    ) -> Result<ConversionOutcome> {
        let color_mode = ColorMode::for_pixel_format(image.native_format());
        let spec = PageSpec::new(&self.defaults, color_mode)?;
        let page_failed = |e: ImgToPdfError| {
            ImgToPdfError::page_failed(image.path().to_path_buf(), e.to_string())
        };

        writer.begin_page(&spec).map_err(page_failed)?;
        writer.draw_image(image).map_err(page_failed)?;
        writer.end_page().map_err(page_failed)?;

        Ok(ConversionOutcome::Rendered {
            page: writer.pages(),
            color_mode,
        })
    }

    /// Decode `input` and append it to `writer`.
    ///
    /// A decode failure becomes [`ConversionOutcome::DecodeFailed`]; a writer
    /// failure becomes [`ConversionOutcome::PageFailed`].
    pub fn render(&self, input: &Path, writer: &mut dyn PagedDocumentWriter) -> ConversionOutcome {
        self.settle(self.decode(input), writer)
    }

    /// Turn a decode result into an outcome, appending on success.
    pub(crate) fn settle(
        &self,
        decoded: Result<DecodedImage>,
        writer: &mut dyn PagedDocumentWriter,
    ) -> ConversionOutcome {
        let image = match decoded {
            Ok(image) => image,
            Err(err) => return ConversionOutcome::DecodeFailed { reason: reason_of(err) },
        };

        match self.append(&image, writer) {
            Ok(outcome) => outcome,
            Err(err) => ConversionOutcome::PageFailed { reason: reason_of(err) },
        }
    }
}

fn reason_of(err: ImgToPdfError) -> String {
    match err {
        ImgToPdfError::FailedToDecode { reason, .. } | ImgToPdfError::PageFailed { reason, .. } => {
            reason
        }
        other => other.to_string(),
    }
}
