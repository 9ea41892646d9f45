//! Paper size catalog.
//!
//! A fixed table mapping each [`PaperSize`] to its display name and physical
//! dimensions in millimetres (portrait, width first). The table is kept in
//! display-name order so [`PaperCatalog::all`] can be listed directly.

use std::fmt;
use std::str::FromStr;

use crate::error::ImgToPdfError;

/// Millimetres per inch.
const MM_PER_INCH: f64 = 25.4;

/// Paper size identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaperSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
    A8,
    A9,
    B0,
    B1,
    B2,
    B3,
    B4,
    B5,
    B6,
    B7,
    B8,
    B9,
    B10,
    C5E,
    Comm10E,
    Dle,
    Executive,
    Folio,
    Ledger,
    Legal,
    Letter,
    Tabloid,
    /// Dimensions supplied by the caller.
    Custom,
}

struct PaperEntry {
    size: PaperSize,
    name: &'static str,
    dimensions: Option<(f64, f64)>,
}

const fn entry(size: PaperSize, name: &'static str, w: f64, h: f64) -> PaperEntry {
    PaperEntry {
        size,
        name,
        dimensions: Some((w, h)),
    }
}

// Sorted by name.
static CATALOG: [PaperEntry; 31] = [
    entry(PaperSize::A0, "A0", 841.0, 1189.0),
    entry(PaperSize::A1, "A1", 594.0, 841.0),
    entry(PaperSize::A2, "A2", 420.0, 594.0),
    entry(PaperSize::A3, "A3", 297.0, 420.0),
    entry(PaperSize::A4, "A4", 210.0, 297.0),
    entry(PaperSize::A5, "A5", 148.0, 210.0),
    entry(PaperSize::A6, "A6", 105.0, 148.0),
    entry(PaperSize::A7, "A7", 74.0, 105.0),
    entry(PaperSize::A8, "A8", 52.0, 74.0),
    entry(PaperSize::A9, "A9", 37.0, 52.0),
    entry(PaperSize::B0, "B0", 1000.0, 1414.0),
    entry(PaperSize::B1, "B1", 707.0, 1000.0),
    entry(PaperSize::B10, "B10", 31.0, 44.0),
    entry(PaperSize::B2, "B2", 500.0, 707.0),
    entry(PaperSize::B3, "B3", 353.0, 500.0),
    entry(PaperSize::B4, "B4", 250.0, 353.0),
    entry(PaperSize::B5, "B5", 176.0, 250.0),
    entry(PaperSize::B6, "B6", 125.0, 176.0),
    entry(PaperSize::B7, "B7", 88.0, 125.0),
    entry(PaperSize::B8, "B8", 62.0, 88.0),
    entry(PaperSize::B9, "B9", 44.0, 62.0),
    entry(PaperSize::C5E, "C5E", 163.0, 229.0),
    entry(PaperSize::Comm10E, "Comm10E", 105.0, 241.0),
    PaperEntry {
        size: PaperSize::Custom,
        name: "Custom",
        dimensions: None,
    },
    entry(PaperSize::Dle, "DLE", 110.0, 220.0),
    entry(PaperSize::Executive, "Executive", 190.5, 254.0),
    entry(PaperSize::Folio, "Folio", 210.0, 330.0),
    entry(PaperSize::Ledger, "Ledger", 431.8, 279.4),
    entry(PaperSize::Legal, "Legal", 215.9, 355.6),
    entry(PaperSize::Letter, "Letter", 215.9, 279.4),
    entry(PaperSize::Tabloid, "Tabloid", 279.4, 431.8),
];

/// Read-only lookup over the paper size table.
pub struct PaperCatalog;

impl PaperCatalog {
    fn entry(size: PaperSize) -> &'static PaperEntry {
        // Every variant has exactly one row.
        CATALOG
            .iter()
            .find(|e| e.size == size)
            .unwrap_or(&CATALOG[0])
    }

    /// Display name of a paper size.
    pub fn name_of(size: PaperSize) -> &'static str {
        Self::entry(size).name
    }

    /// Physical `(width, height)` in millimetres, portrait.
    ///
    /// `None` for [`PaperSize::Custom`], whose dimensions come from the caller.
    pub fn dimensions_mm(size: PaperSize) -> Option<(f64, f64)> {
        Self::entry(size).dimensions
    }

    /// All paper sizes, sorted by display name.
    pub fn all() -> impl Iterator<Item = PaperSize> + Clone {
        CATALOG.iter().map(|e| e.size)
    }

    /// Look a size up by display name, ignoring case.
    pub fn find(name: &str) -> Option<PaperSize> {
        CATALOG
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
            .map(|e| e.size)
    }

    /// The listing line for a size, e.g. `A4 (210 mm x 297 mm)`.
    pub fn describe(size: PaperSize) -> String {
        match Self::dimensions_mm(size) {
            Some((w, h)) => format!("{} ({w} mm x {h} mm)", Self::name_of(size)),
            None => format!("{} (set dimensions by yourself)", Self::name_of(size)),
        }
    }
}

impl PaperSize {
    /// Display name.
    pub fn name(self) -> &'static str {
        PaperCatalog::name_of(self)
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaperSize {
    type Err = ImgToPdfError;

    fn from_str(s: &str) -> crate::Result<Self> {
        PaperCatalog::find(s).ok_or_else(|| {
            ImgToPdfError::invalid_config(format!(
                "Unknown page size: {s}. Run with --list-page-sizes to see the supported names"
            ))
        })
    }
}

/// Convert millimetres to PostScript points (1/72 inch).
pub fn mm_to_points(mm: f64) -> f64 {
    mm * 72.0 / MM_PER_INCH
}
