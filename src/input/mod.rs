//! Input resolution.
//!
//! Raw positional arguments go through three stages:
//! 1. [`split_output`] removes a trailing `.pdf`/`.ps` argument
//! 2. [`PathMatcher`] expands the rest into absolute candidate files
//! 3. [`ImageFileFilter`] keeps the decodable ones, then duplicates are dropped
//!
//! # Examples
//!
//! ```no_run
//! use imgtopdf::config::RecursionDepth;
//! use imgtopdf::decode::RasterDecoder;
//! use imgtopdf::input::InputResolver;
//! use std::sync::Arc;
//!
//! let resolver = InputResolver::new(Arc::new(RasterDecoder::new()), RecursionDepth::default());
//! let resolved = resolver.resolve(&["scans/", "cover.jpg", "book.pdf"]).unwrap();
//! println!("{} images", resolved.inputs.len());
//! ```

pub mod filter;
pub mod matcher;
pub mod resolver;

pub use filter::ImageFileFilter;
pub use matcher::PathMatcher;
pub use resolver::{InputResolver, ResolvedArgs, split_output};
