//! Local staging of incoming uploads.
//!
//! Every staged file lives under the configured staging directory with a unique
//! name and the original file's extension. A [`StagedFile`] owns its path
//! exclusively: [`StagedFile::release`] removes it, and dropping an unreleased
//! guard (error paths, cancelled requests) removes it as well.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

const STAGED_FILE_PREFIX: &str = "upload-";

/// Staging operation errors
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Failed to prepare staging directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create staged file in {}: {source}", dir.display())]
    Create {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write staged file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove staged file {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes incoming byte streams to uniquely named files in a shared directory.
#[derive(Clone, Debug)]
pub struct StagingStore {
    dir: PathBuf,
}

impl StagingStore {
    /// Create a staging store rooted at `dir`, creating the directory if needed.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, StagingError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StagingError::Directory {
                path: dir.clone(),
                source,
            })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy the whole of `reader` into a new staged file.
    ///
    /// The file keeps the extension of `original_file_name`. If the stream
    /// cannot be fully read or the write fails, the partial file is removed
    /// before the error is returned.
    #[tracing::instrument(skip(self, reader), fields(staging_dir = %self.dir.display()))]
    pub async fn stage<R>(
        &self,
        mut reader: R,
        original_file_name: &str,
    ) -> Result<StagedFile, StagingError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let start = std::time::Instant::now();
        let suffix = extension_suffix(original_file_name);

        let dir = self.dir.clone();
        let named = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(STAGED_FILE_PREFIX)
                .suffix(&suffix)
                .tempfile_in(&dir)
        })
        .await
        .map_err(io::Error::other)
        .and_then(|created| created)
        .map_err(|source| StagingError::Create {
            dir: self.dir.clone(),
            source,
        })?;
        let (std_file, temp_path) = named.into_parts();

        // Guard first, so an early return below still removes the file.
        let mut staged = StagedFile {
            path: Some(temp_path),
            size_bytes: 0,
        };
        let path = staged.path().to_path_buf();

        let mut file = fs::File::from_std(std_file);
        let write_err = |source| StagingError::Write {
            path: path.clone(),
            source,
        };

        let bytes_copied = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(write_err)?;
        file.flush().await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        drop(file);

        staged.size_bytes = bytes_copied;

        tracing::debug!(
            path = %path.display(),
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload staged"
        );

        Ok(staged)
    }
}

/// Exclusive handle to one staged file.
#[derive(Debug)]
pub struct StagedFile {
    path: Option<TempPath>,
    size_bytes: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        match &self.path {
            Some(path) => &**path,
            None => Path::new(""),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Remove the staged file. A file that is already gone is not an error.
    ///
    /// Removal runs on the blocking pool and completes even if the caller is
    /// cancelled while waiting for it.
    pub async fn release(mut self) -> Result<(), StagingError> {
        let Some(temp_path) = self.path.take() else {
            return Ok(());
        };
        let path = temp_path.to_path_buf();

        let closed = tokio::task::spawn_blocking(move || temp_path.close())
            .await
            .map_err(io::Error::other)
            .and_then(|closed| closed);

        match closed {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Staged file released");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Staged file already removed");
                Ok(())
            }
            Err(source) => Err(StagingError::Remove { path, source }),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Some(temp_path) = &self.path {
            // TempPath removes the file when it is dropped right after this.
            // Drop cannot await, so this one path removes the file inline.
            tracing::debug!(
                path = %temp_path.display(),
                "Staged file dropped without release; removing"
            );
        }
    }
}

/// `.ext` of the original file name, or empty when there is no usable extension.
fn extension_suffix(original_file_name: &str) -> String {
    Path::new(original_file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
