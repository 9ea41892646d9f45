//! Expansion of path and glob arguments into candidate files.

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::RecursionDepth;
use crate::utils::{absolutize, is_glob_pattern, normalize_lexically};

/// Expands user patterns into absolute file paths.
///
/// Literal files are taken as they are with `.` and `..` removed, directories are enumerated up to the
/// configured depth without following symbolic links, and glob patterns are
/// matched case-sensitively against absolute paths. Anything that does not
/// exist or cannot be listed is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathMatcher {
    depth: RecursionDepth,
}

impl PathMatcher {
    /// Create a matcher enumerating directories to `depth`.
    pub fn new(depth: RecursionDepth) -> Self {
        Self { depth }
    }

    /// Expand `patterns`, keeping argument order.
    ///
    /// Directory entries and glob matches come out in lexicographic order, so
    /// the result is stable for an unchanged filesystem. Duplicates are kept.
    pub fn expand<S: AsRef<str>>(&self, patterns: &[S]) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            if is_glob_pattern(pattern) {
                self.expand_glob(pattern, &mut paths);
            } else {
                self.expand_literal(Path::new(pattern), &mut paths);
            }
        }

        paths
    }

    fn expand_literal(&self, path: &Path, out: &mut Vec<PathBuf>) {
        let Ok(path) = absolutize(path) else {
            debug!(path = %path.display(), "cannot resolve path");
            return;
        };
        self.collect(path, out);
    }

    fn expand_glob(&self, pattern: &str, out: &mut Vec<PathBuf>) {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let absolute = absolute_pattern(pattern);
        let entries = match glob::glob_with(&absolute, options) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(%pattern, error = %err, "invalid glob pattern");
                return;
            }
        };

        for entry in entries {
            match entry {
                Ok(path) => self.collect(path, out),
                Err(err) => debug!(path = %err.path().display(), "unreadable glob entry"),
            }
        }
    }

    fn collect(&self, path: PathBuf, out: &mut Vec<PathBuf>) {
        if path.is_file() {
            out.push(normalize_lexically(&path));
        } else if path.is_dir() {
            self.enumerate(&normalize_lexically(&path), out);
        } else {
            debug!(path = %path.display(), "no such file or directory");
        }
    }

    fn enumerate(&self, dir: &Path, out: &mut Vec<PathBuf>) {
        let mut walker = WalkDir::new(dir)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        match self.depth.max_depth() {
            Some(0) => return,
            Some(depth) => walker = walker.max_depth(depth),
            None => {}
        }

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => out.push(entry.into_path()),
                Ok(_) => {}
                Err(err) => debug!(dir = %dir.display(), error = %err, "skipping unlistable entry"),
            }
        }
    }
}

/// Anchor a relative glob at the current directory.
///
/// The directory part is escaped so its own metacharacters match literally.
fn absolute_pattern(pattern: &str) -> String {
    if Path::new(pattern).is_absolute() {
        return pattern.to_string();
    }

    match std::env::current_dir() {
        Ok(cwd) => match cwd.to_str() {
            Some(cwd) => format!("{}/{pattern}", Pattern::escape(cwd)),
            None => pattern.to_string(),
        },
        Err(_) => pattern.to_string(),
    }
}
