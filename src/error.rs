//! Error types for imgtopdf.
//!
//! Errors carry the offending path wherever one exists so the user can see
//! which input or output caused the failure.
//!
//! # Error Categories
//!
//! - **Argument errors**: malformed or absent invocation, detected before any I/O
//! - **Parse failures**: input resolution produced no images
//! - **Decode failures**: one image could not be read (recoverable)
//! - **Page failures**: the document writer rejected a page (fatal)
//! - **Write errors**: the finished document could not be committed (fatal)

use std::io;
use std::path::PathBuf;

/// Result type alias for imgtopdf operations.
pub type Result<T> = std::result::Result<T, ImgToPdfError>;

/// Process exit codes.
///
/// The ordinals are stable and ordered by severity, so the most severe of
/// several codes is simply the largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Every stage completed.
    #[default]
    Success = 0,
    /// Input resolution produced no images.
    ParseFailure = 1,
    /// Malformed or absent command line.
    ArgumentError = 2,
    /// The output document could not be finalized.
    WriteError = 3,
    /// An input or the output stream could not be opened or written.
    FileFailure = 4,
}

impl ExitCode {
    /// Numeric value handed to the operating system.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// The more severe of two codes.
    pub fn most_severe(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Main error type for imgtopdf operations.
#[derive(Debug, thiserror::Error)]
pub enum ImgToPdfError {
    /// Help was requested or no arguments were given.
    #[error("Usage:\n\timgtopdf input.img output.pdf")]
    Usage,

    /// The command line could not be parsed.
    #[error("{message}")]
    InvalidArguments {
        /// Parser message.
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// No trailing `.pdf` or `.ps` argument names the output document.
    #[error(
        "No output document given\n  \
         Hint: end the argument list with a path ending in .pdf or .ps"
    )]
    MissingOutput,

    /// Input resolution yielded zero decodable images.
    #[error("No readable images found in the given inputs")]
    NoInputs,

    /// Failed to create the output stream.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to decode an input image.
    #[error("Could not load image {}\n  Reason: {reason}", path.display())]
    FailedToDecode {
        /// Path to the image.
        path: PathBuf,
        /// Reason reported by the decoder.
        reason: String,
    },

    /// The writer could not begin, draw, or end a page.
    #[error("Could not convert {}\n  Reason: {reason}", path.display())]
    PageFailed {
        /// Input whose page failed.
        path: PathBuf,
        /// Reason reported by the writer.
        reason: String,
    },

    /// Failed to finalize the output document.
    #[error("Failed to write output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for ImgToPdfError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl ImgToPdfError {
    /// Create an InvalidArguments error.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a FailedToCreateOutput error.
    pub fn failed_to_create_output(path: PathBuf, source: io::Error) -> Self {
        Self::FailedToCreateOutput { path, source }
    }

    /// Create a FailedToDecode error.
    pub fn failed_to_decode(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToDecode {
            path,
            reason: reason.into(),
        }
    }

    /// Create a PageFailed error.
    pub fn page_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::PageFailed {
            path,
            reason: reason.into(),
        }
    }

    /// Create a FailedToWrite error.
    pub fn failed_to_write(path: PathBuf, source: io::Error) -> Self {
        Self::FailedToWrite { path, source }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Usage => ExitCode::ArgumentError,
            Self::InvalidArguments { .. } => ExitCode::ArgumentError,
            Self::InvalidConfig { .. } => ExitCode::ArgumentError,
            Self::MissingOutput => ExitCode::ArgumentError,
            Self::NoInputs => ExitCode::ParseFailure,
            Self::FailedToCreateOutput { .. } => ExitCode::FileFailure,
            Self::FailedToDecode { .. } => ExitCode::FileFailure,
            Self::PageFailed { .. } => ExitCode::FileFailure,
            Self::FailedToWrite { .. } => ExitCode::WriteError,
            Self::Io { .. } => ExitCode::FileFailure,
            Self::Other { .. } => ExitCode::FileFailure,
        }
    }
}
