use crate::error::{Error, Result};
use std::fs::{self, DirBuilder};
use std::path::Path;

/// Persists generated source, refusing to clobber existing files unless forced
#[derive(Debug, Clone, Copy)]
pub struct SourceWriter {
    kind: &'static str,
    force: bool,
}

impl SourceWriter {
    pub fn new(kind: &'static str, force: bool) -> Self {
        Self { kind, force }
    }

    pub fn force(&self) -> bool {
        self.force
    }

    /// Fail with `PreexistingTarget` if `path` exists and force is off
    pub fn ensure_writable(&self, path: &Path) -> Result<()> {
        if !self.force && path.exists() {
            return Err(Error::PreexistingTarget {
                kind: self.kind,
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Write `contents` to `path`, creating missing parent directories.
    ///
    /// Directories created before a failed write are left in place.
    pub fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.ensure_writable(path)?;

        if let Some(parent) = path.parent() {
            make_directory(parent).map_err(|source| Error::WriteFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, contents).map_err(|source| Error::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }
}

fn make_directory(dir: &Path) -> std::io::Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    builder.create(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_directories() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("Models").join("Blog").join("Post.php");

        SourceWriter::new("AndphpModel", false)
            .write(&target, "<?php\n")
            .unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "<?php\n");
    }

    #[test]
    fn test_refuses_existing_file_without_force() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("User.php");
        fs::write(&target, "original").unwrap();

        let err = SourceWriter::new("AndphpModel", false)
            .write(&target, "replacement")
            .unwrap_err();

        assert!(err.is_preexisting_target());
        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
    }

    #[test]
    fn test_force_overwrites() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("User.php");
        fs::write(&target, "original").unwrap();

        let writer = SourceWriter::new("AndphpModel", true);
        assert!(writer.force());
        writer.write(&target, "replacement").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "replacement");
    }

    #[test]
    fn test_write_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        // a regular file where a directory is needed
        let blocker = tmp.path().join("Models");
        fs::write(&blocker, "").unwrap();

        let err = SourceWriter::new("AndphpModel", false)
            .write(&blocker.join("User.php"), "<?php\n")
            .unwrap_err();

        assert!(matches!(err, Error::WriteFailed { .. }));
    }
}
