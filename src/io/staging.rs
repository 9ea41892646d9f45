//! Atomic output files.
//!
//! Bytes go to a temporary file beside the target; the target is replaced by
//! a rename only on commit.

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ImgToPdfError, Result};

const BUFFER_SIZE: usize = 64 * 1024;

/// A pending output file.
pub(crate) struct StagedFile {
    target: PathBuf,
    writer: BufWriter<NamedTempFile>,
    opened_at: Instant,
}

impl StagedFile {
    /// Create the temporary file next to `target`.
    pub(crate) fn create(target: &Path) -> Result<Self> {
        let fail = |source| ImgToPdfError::failed_to_create_output(target.to_path_buf(), source);

        if target.is_dir() {
            return Err(fail(io::Error::other("output path is a directory")));
        }

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".imgtopdf-").suffix(".tmp");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o644));
        }

        let temp = builder.tempfile_in(dir).map_err(fail)?;
        debug!(output = %target.display(), temp = %temp.path().display(), "staged output");

        Ok(Self {
            target: target.to_path_buf(),
            writer: BufWriter::with_capacity(BUFFER_SIZE, temp),
            opened_at: Instant::now(),
        })
    }

    /// Final destination.
    pub(crate) fn target(&self) -> &Path {
        &self.target
    }

    /// Buffered writer over the temporary file.
    pub(crate) fn writer(&mut self) -> &mut BufWriter<NamedTempFile> {
        &mut self.writer
    }

    /// Flush and atomically move the file onto the target.
    ///
    /// Returns the committed size in bytes and the time since creation.
    pub(crate) fn commit(self) -> Result<(u64, std::time::Duration)> {
        let target = self.target;
        let fail = |source| ImgToPdfError::failed_to_write(target.clone(), source);

        let temp = self.writer.into_inner().map_err(|e| fail(e.into_error()))?;
        temp.as_file().sync_all().map_err(fail)?;
        temp.persist(&target).map_err(|e| fail(e.error))?;

        let file_size = std::fs::metadata(&target).map(|m| m.len()).unwrap_or(0);
        Ok((file_size, self.opened_at.elapsed()))
    }

    /// Delete the temporary file.
    pub(crate) fn discard(self) {
        debug!(output = %self.target.display(), "discarding staged output");
        // NamedTempFile removes itself on drop.
        drop(self.writer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_commit_moves_into_place() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.pdf");

        let mut staged = StagedFile::create(&target).unwrap();
        staged.writer().write_all(b"%PDF-1.5").unwrap();
        assert!(!target.exists());

        let (size, _) = staged.commit().unwrap();
        assert_eq!(size, 8);
        assert_eq!(std::fs::read(&target).unwrap(), b"%PDF-1.5");
        assert_eq!(entries(dir.path()), 1);
    }

    #[test]
    fn test_discard_leaves_existing_target_untouched() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.pdf");
        std::fs::write(&target, b"previous").unwrap();

        let mut staged = StagedFile::create(&target).unwrap();
        staged.writer().write_all(b"partial").unwrap();
        staged.discard();

        assert_eq!(std::fs::read(&target).unwrap(), b"previous");
        assert_eq!(entries(dir.path()), 1);
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("out.pdf");

        let err = StagedFile::create(&target).err().unwrap();
        assert!(matches!(err, ImgToPdfError::FailedToCreateOutput { .. }));
    }

    #[test]
    fn test_create_over_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = StagedFile::create(dir.path()).err().unwrap();
        assert!(matches!(err, ImgToPdfError::FailedToCreateOutput { .. }));
    }
}
