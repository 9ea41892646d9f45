//! Utilities for path handling and human-readable formatting.

use std::path::{Component, Path, PathBuf};

/// Characters that make a pattern a glob rather than a literal path.
const GLOB_METACHARACTERS: [char; 3] = ['*', '?', '['];

/// Whether a pattern contains shell-style glob metacharacters.
///
/// ```
/// use imgtopdf::utils::is_glob_pattern;
///
/// assert!(is_glob_pattern("scans/*.png"));
/// assert!(!is_glob_pattern("scans/page1.png"));
/// ```
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(GLOB_METACHARACTERS)
}

/// Resolve a path against the current directory without touching symlinks.
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    std::path::absolute(path)
}

/// Remove `.` and `..` components without touching the filesystem.
///
/// `..` cancels the preceding component even when that component is a
/// symbolic link.
///
/// ```
/// use imgtopdf::utils::normalize_lexically;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     normalize_lexically(Path::new("/scans/./raw/../a.png")),
///     PathBuf::from("/scans/a.png")
/// );
/// ```
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normal = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if normal.file_name().is_some() {
                    normal.pop();
                } else if !normal.has_root() {
                    normal.push("..");
                }
            }
            other => normal.push(other),
        }
    }
    normal
}

/// Lower-cased extension of a path-like string, if any.
pub fn extension_lowercase(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.png"));
        assert!(is_glob_pattern("img?.jpg"));
        assert!(is_glob_pattern("img[0-9].jpg"));
        assert!(!is_glob_pattern("/tmp/plain.jpg"));
    }

    #[test]
    fn test_absolutize_keeps_absolute() {
        let abs = absolutize(Path::new("/tmp/a.png")).unwrap();
        assert_eq!(abs, PathBuf::from("/tmp/a.png"));

        let rel = absolutize(Path::new("a.png")).unwrap();
        assert!(rel.is_absolute());
    }

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/a/b/../c/./d.png")),
            PathBuf::from("/a/c/d.png")
        );
        assert_eq!(normalize_lexically(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(
            normalize_lexically(Path::new("../../x")),
            PathBuf::from("../../x")
        );
    }

    #[test]
    fn test_extension_lowercase() {
        assert_eq!(extension_lowercase("out.PDF").as_deref(), Some("pdf"));
        assert_eq!(extension_lowercase("dir.d/out"), None);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(500), "500 bytes");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.00 GB");
    }
}
