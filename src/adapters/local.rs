use crate::core::Storage;
use crate::utils::error::{IdentityError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes output files into a directory on the local filesystem.
///
/// With no directory the files land in the working directory and no
/// directory check is made.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: Option<PathBuf>,
}

impl LocalStorage {
    pub fn new(base_path: Option<PathBuf>) -> Self {
        Self { base_path }
    }
}

/// Whether the current process may create files in `dir`, judged with the
/// effective uid/gid rather than the mode bits alone.
#[cfg(unix)]
fn is_writable_dir(dir: &Path) -> bool {
    use nix::unistd::{access, AccessFlags};

    dir.is_dir() && access(dir, AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
fn is_writable_dir(dir: &Path) -> bool {
    fs::metadata(dir)
        .map(|meta| meta.is_dir() && !meta.permissions().readonly())
        .unwrap_or(false)
}

impl Storage for LocalStorage {
    fn resolve(&self, name: &str) -> PathBuf {
        match &self.base_path {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    fn ensure_writable(&self) -> Result<()> {
        let Some(dir) = &self.base_path else {
            return Ok(());
        };

        if is_writable_dir(dir) {
            Ok(())
        } else {
            Err(IdentityError::OutputDirectoryError { path: dir.clone() })
        }
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.resolve(name);

        let mut file = fs::File::create(&path).map_err(|source| IdentityError::OutputFileError {
            path: path.clone(),
            source,
        })?;
        file.write_all(data)
            .and_then(|_| file.flush())
            .map_err(|source| IdentityError::OutputFileError {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}
