//! Configuration module for imgtopdf.
//!
//! This module holds the validated, normalized configuration that drives a
//! conversion run. It is derived from the command line by
//! [`Cli::to_config`](crate::cli::Cli::to_config) and handles:
//! - Page defaults (paper size, orientation, resolution)
//! - Directory recursion depth
//! - Worker pool sizing
//! - The policy for a missing output document

use anyhow::{Context, Result, bail};
use std::str::FromStr;

use crate::ImgToPdfError;
use crate::paper::{PaperCatalog, PaperSize};

/// Screen resolution used to size images on the page.
pub const DEFAULT_RESOLUTION_DPI: u32 = 96;

/// Highest accepted `--resolution`.
pub const MAX_RESOLUTION_DPI: u32 = 9600;

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Height greater than width.
    Portrait,
    /// Width greater than height.
    #[default]
    Landscape,
}

impl FromStr for Orientation {
    type Err = ImgToPdfError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(ImgToPdfError::InvalidConfig {
                message: format!("Invalid orientation: {s}. Must be one of: portrait, landscape"),
            }),
        }
    }
}

/// How deep directory arguments are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionDepth {
    /// Enumerate at most this many levels below the directory.
    ///
    /// `0` means directories contribute no files, `1` means immediate entries.
    Depth(usize),
    /// Walk the whole tree.
    Unlimited,
}

impl Default for RecursionDepth {
    fn default() -> Self {
        Self::Depth(1)
    }
}

impl RecursionDepth {
    /// Depth limit for a directory walk, `None` when unbounded.
    pub fn max_depth(&self) -> Option<usize> {
        match self {
            Self::Depth(n) => Some(*n),
            Self::Unlimited => None,
        }
    }
}

impl FromStr for RecursionDepth {
    type Err = ImgToPdfError;

    fn from_str(s: &str) -> crate::Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("unlimited") {
            return Ok(Self::Unlimited);
        }

        s.parse::<usize>().map(Self::Depth).map_err(|_| {
            ImgToPdfError::invalid_config(format!(
                "Invalid recursion depth: {s}. Must be a number or 'unlimited'"
            ))
        })
    }
}

/// Caller-specified paper dimensions for [`PaperSize::Custom`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomSize {
    /// Width in millimetres.
    pub width_mm: f64,
    /// Height in millimetres.
    pub height_mm: f64,
}

impl CustomSize {
    /// Parse a `WIDTHxHEIGHT` string in millimetres.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgtopdf::config::CustomSize;
    ///
    /// let size = CustomSize::parse("100x150.5").unwrap();
    /// assert_eq!(size.width_mm, 100.0);
    /// assert_eq!(size.height_mm, 150.5);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let Some((w, h)) = s.trim().split_once(['x', 'X']) else {
            bail!("Invalid custom size: {s}. Expected format like '100x150'");
        };

        let width_mm: f64 = w
            .trim()
            .parse()
            .with_context(|| format!("Invalid width: {w}"))?;
        let height_mm: f64 = h
            .trim()
            .parse()
            .with_context(|| format!("Invalid height: {h}"))?;

        if !(width_mm.is_finite() && height_mm.is_finite()) || width_mm <= 0.0 || height_mm <= 0.0
        {
            bail!("Custom size dimensions must be positive millimetre values");
        }

        Ok(Self {
            width_mm,
            height_mm,
        })
    }
}

/// Per-run page settings shared by every image.
///
/// Colour mode is chosen per image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpecDefaults {
    /// Paper size.
    pub paper_size: PaperSize,
    /// Page orientation.
    pub orientation: Orientation,
    /// Pixels per inch used to place images at their native size.
    pub resolution_dpi: u32,
    /// Dimensions for [`PaperSize::Custom`].
    pub custom_size: Option<CustomSize>,
}

impl Default for PageSpecDefaults {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Landscape,
            resolution_dpi: DEFAULT_RESOLUTION_DPI,
            custom_size: None,
        }
    }
}

impl PageSpecDefaults {
    /// Portrait `(width, height)` of the paper in millimetres.
    pub fn paper_mm(&self) -> Option<(f64, f64)> {
        match self.paper_size {
            PaperSize::Custom => self.custom_size.map(|c| (c.width_mm, c.height_mm)),
            size => PaperCatalog::dimensions_mm(size),
        }
    }

    /// Validate the page settings.
    pub fn validate(&self) -> Result<()> {
        if self.resolution_dpi == 0 || self.resolution_dpi > MAX_RESOLUTION_DPI {
            bail!(
                "Resolution must be between 1 and {MAX_RESOLUTION_DPI} dpi, got {}",
                self.resolution_dpi
            );
        }

        match (self.paper_size, self.custom_size) {
            (PaperSize::Custom, None) => {
                bail!("Page size Custom requires --custom-size WIDTHxHEIGHT")
            }
            (size, Some(_)) if size != PaperSize::Custom => {
                bail!("--custom-size can only be used with --page-size Custom")
            }
            _ => Ok(()),
        }
    }
}

/// Complete configuration for a conversion run.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Verbose output mode.
    pub verbose: bool,

    /// Number of parallel decode jobs (None = auto-detect).
    pub jobs: Option<usize>,

    /// How deep directory arguments are enumerated.
    pub recursion: RecursionDepth,

    /// Page settings applied to every image.
    pub page: PageSpecDefaults,
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Jobs count is zero
    /// - Page settings are inconsistent
    pub fn validate(&self) -> Result<()> {
        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        self.page.validate()
    }

    /// Get the effective number of parallel decode jobs.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
