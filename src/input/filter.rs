//! Keeps only files the decoder can read.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::decode::ImageDecoder;

/// Header-sniffing filter over candidate paths.
#[derive(Clone)]
pub struct ImageFileFilter {
    decoder: Arc<dyn ImageDecoder>,
}

impl ImageFileFilter {
    /// Create a filter backed by `decoder`.
    pub fn new(decoder: Arc<dyn ImageDecoder>) -> Self {
        Self { decoder }
    }

    /// Whether `path` looks like a decodable image. Never fails.
    pub fn can_decode(&self, path: &Path) -> bool {
        let accepted = self.decoder.probe(path);
        if !accepted {
            debug!(path = %path.display(), "not a readable image");
        }
        accepted
    }

    /// Keep the decodable paths, preserving order.
    pub fn retain(&self, paths: Vec<PathBuf>) -> Vec<PathBuf> {
        paths.into_iter().filter(|p| self.can_decode(p)).collect()
    }
}
