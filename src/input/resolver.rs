//! Turns the positional arguments into inputs and an output target.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use super::filter::ImageFileFilter;
use super::matcher::PathMatcher;
use crate::config::RecursionDepth;
use crate::decode::ImageDecoder;
use crate::error::{ImgToPdfError, Result};
use crate::io::OutputTarget;

/// Inputs and target of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArgs {
    /// Absolute, unique, decodable image paths in first-seen order.
    pub inputs: Vec<PathBuf>,
    /// Document named by the trailing argument.
    pub output: OutputTarget,
}

/// Split off a trailing `.pdf` / `.ps` argument.
///
/// `args` are positional arguments with options already removed, so every
/// argument counts, including names that start with `-`.
///
/// ```
/// use imgtopdf::input::split_output;
/// use imgtopdf::io::OutputFormat;
///
/// let (patterns, output) = split_output(&["a.png", "-b.png", "out.PS"]);
/// assert_eq!(patterns, vec!["a.png", "-b.png"]);
/// assert_eq!(output.unwrap().format, OutputFormat::PostScript);
/// ```
pub fn split_output<S: AsRef<str>>(args: &[S]) -> (Vec<&str>, Option<OutputTarget>) {
    let mut positional: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();

    let output = positional
        .last()
        .and_then(|last| OutputTarget::from_argument(last));
    if output.is_some() {
        positional.pop();
    }

    (positional, output)
}

/// Resolves positional arguments against the filesystem.
#[derive(Clone)]
pub struct InputResolver {
    matcher: PathMatcher,
    filter: ImageFileFilter,
}

impl InputResolver {
    /// Create a resolver probing files with `decoder`.
    pub fn new(decoder: Arc<dyn ImageDecoder>, depth: RecursionDepth) -> Self {
        Self {
            matcher: PathMatcher::new(depth),
            filter: ImageFileFilter::new(decoder),
        }
    }

    /// Resolve positional `args` into inputs and the output target.
    ///
    /// Options must already be removed; an argument such as `-scan.png` that
    /// followed `--` is an input like any other.
    ///
    /// # Errors
    ///
    /// - [`ImgToPdfError::MissingOutput`] when no trailing `.pdf`/`.ps`
    ///   argument was given; checked before any filesystem access
    /// - [`ImgToPdfError::NoInputs`] when nothing decodable remains
    pub fn resolve<S: AsRef<str>>(&self, args: &[S]) -> Result<ResolvedArgs> {
        let (patterns, output) = split_output(args);
        let output = output.ok_or(ImgToPdfError::MissingOutput)?;

        let candidates = self.matcher.expand(&patterns);
        let found = candidates.len();
        let inputs = dedupe(self.filter.retain(candidates));

        debug!(
            patterns = patterns.len(),
            candidates = found,
            inputs = inputs.len(),
            "resolved inputs"
        );

        if inputs.is_empty() {
            return Err(ImgToPdfError::NoInputs);
        }

        Ok(ResolvedArgs { inputs, output })
    }
}

/// Drop repeated paths, keeping the first occurrence.
fn dedupe(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::with_capacity(paths.len());
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
