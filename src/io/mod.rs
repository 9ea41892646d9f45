//! Output documents.
//!
//! This module handles everything written to disk:
//! - The [`OutputTarget`] named by the trailing argument
//! - The [`PagedDocumentWriter`] session pages are appended to
//! - PDF ([`PdfDocumentWriter`]) and PostScript ([`PostScriptWriter`]) backends
//! - Atomic commit of the finished document
//!
//! # Examples
//!
//! ```no_run
//! use imgtopdf::io::{DocumentBackend, FileBackend, OutputTarget};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let target = OutputTarget::from_argument("album.pdf").unwrap();
//! let writer = FileBackend::new().open(&target)?;
//! // ... append pages ...
//! let stats = writer.finish()?;
//! println!("Wrote {} pages", stats.pages);
//! # Ok(())
//! # }
//! ```

pub mod pdf;
pub mod postscript;
mod staging;

pub use pdf::PdfDocumentWriter;
pub use postscript::PostScriptWriter;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::convert::PageSpec;
use crate::decode::DecodedImage;
use crate::error::Result;
use crate::utils::{extension_lowercase, format_file_size};

/// Paginated output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Portable Document Format.
    Pdf,
    /// PostScript.
    PostScript,
}

impl OutputFormat {
    /// Infer the format from a file name's extension, ignoring case.
    pub fn from_extension(path: &str) -> Option<Self> {
        match extension_lowercase(path)?.as_str() {
            "pdf" => Some(Self::Pdf),
            "ps" => Some(Self::PostScript),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => f.write_str("PDF"),
            Self::PostScript => f.write_str("PostScript"),
        }
    }
}

/// The single document a run writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// Path as given on the command line.
    pub path: PathBuf,
    /// Format inferred from the extension.
    pub format: OutputFormat,
}

impl OutputTarget {
    /// Build a target from an argument ending in `.pdf` or `.ps`.
    ///
    /// Returns `None` for any other argument.
    pub fn from_argument(arg: &str) -> Option<Self> {
        OutputFormat::from_extension(arg).map(|format| Self {
            path: PathBuf::from(arg),
            format,
        })
    }
}

/// Statistics about a committed document.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Path the document was committed to.
    pub output_path: PathBuf,

    /// Number of pages in the document.
    pub pages: usize,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Time between opening the session and committing it.
    pub write_time: Duration,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// An open, append-only paginated document.
///
/// Pages appear in the order they are ended. Nothing reaches the target path
/// until [`finish`](Self::finish) succeeds; [`abort`](Self::abort) or dropping
/// the writer discards everything.
pub trait PagedDocumentWriter: Send {
    /// Start a new page.
    fn begin_page(&mut self, spec: &PageSpec) -> Result<()>;

    /// Draw an image at its native size, anchored at the top-left corner.
    fn draw_image(&mut self, image: &DecodedImage) -> Result<()>;

    /// Close the current page.
    fn end_page(&mut self) -> Result<()>;

    /// Number of completed pages.
    fn pages(&self) -> usize;

    /// Finalize and commit the document to the target path.
    fn finish(self: Box<Self>) -> Result<WriteStatistics>;

    /// Discard the document without touching the target path.
    fn abort(self: Box<Self>);
}

/// Opens writers for output targets.
pub trait DocumentBackend: Send + Sync {
    /// Open a writer session for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ImgToPdfError::FailedToCreateOutput`](crate::ImgToPdfError::FailedToCreateOutput)
    /// when the output stream cannot be created.
    fn open(&self, target: &OutputTarget) -> Result<Box<dyn PagedDocumentWriter>>;
}

/// Backend that writes real files, choosing the writer by output format.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileBackend;

impl FileBackend {
    /// Create a new file backend.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentBackend for FileBackend {
    fn open(&self, target: &OutputTarget) -> Result<Box<dyn PagedDocumentWriter>> {
        match target.format {
            OutputFormat::Pdf => Ok(Box::new(PdfDocumentWriter::create(&target.path)?)),
            OutputFormat::PostScript => Ok(Box::new(PostScriptWriter::create(&target.path)?)),
        }
    }
}
