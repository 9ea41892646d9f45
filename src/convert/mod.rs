//! Image-to-page conversion.
//!
//! - [`ConversionJob`] turns one image into one page
//! - [`BatchConverter`] runs a job per input against one shared writer
//!
//! # Examples
//!
//! ```no_run
//! use imgtopdf::config::PageSpecDefaults;
//! use imgtopdf::convert::BatchConverter;
//! use imgtopdf::decode::RasterDecoder;
//! use imgtopdf::io::{FileBackend, OutputTarget};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let converter = BatchConverter::new(Arc::new(RasterDecoder::new()), Arc::new(FileBackend::new()))
//!     .with_jobs(4);
//! let target = OutputTarget::from_argument("scans.pdf").unwrap();
//! let inputs = vec![PathBuf::from("/scans/1.png"), PathBuf::from("/scans/2.png")];
//!
//! let report = converter.run(&inputs, &target, &PageSpecDefaults::default()).await;
//! println!("{} pages, {} skipped", report.rendered(), report.skipped());
//! # }
//! ```

pub mod batch;
pub mod job;

pub use batch::{BatchConverter, BatchReport, BatchState, CancellationFlag};
pub use job::{ColorMode, ConversionJob, ConversionOutcome, ConversionRecord, PageSpec};
