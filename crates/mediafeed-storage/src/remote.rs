//! Remote media host abstraction
//!
//! The host durably stores a staged file and answers with a public URL and the
//! unique name it assigned. One attempt per call; callers decide what to do
//! with a failure.

use async_trait::async_trait;
use thiserror::Error;

use crate::staging::StagedFile;

/// Remote upload errors
#[derive(Debug, Error)]
pub enum RemoteUploadError {
    /// The host answered with a non-success status.
    #[error("Remote host rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The host reported success but left out a field the caller depends on.
    #[error("Remote host response is missing `{0}`")]
    MissingField(&'static str),

    #[error("Remote host returned an unreadable response: {0}")]
    InvalidResponse(String),

    #[error("Failed to reach remote host: {0}")]
    Transport(String),

    #[error("Failed to read staged file: {0}")]
    Io(#[from] std::io::Error),
}

/// Options sent along with an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Ask the host to make the stored name collision free.
    pub use_unique_file_name: bool,
    pub tags: Vec<String>,
    pub folder: Option<String>,
}

impl UploadOptions {
    /// Options for a post upload: unique name, tagged with `tag`.
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self {
            use_unique_file_name: true,
            tags: vec![tag.into()],
            folder: None,
        }
    }

    pub fn with_folder(mut self, folder: Option<String>) -> Self {
        self.folder = folder;
        self
    }
}

/// Successful upload as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUpload {
    /// Absolute public URL of the stored media.
    pub url: String,
    /// Unique name assigned by the host.
    pub name: String,
    /// Host identifier of the asset, used for deletion.
    pub file_id: String,
}

/// Capability to store media on an external host.
///
/// Constructed once at startup and injected into the upload service.
#[async_trait]
pub trait RemoteMediaHost: Send + Sync {
    /// Send the staged file, asking the host to store it under `display_name`.
    async fn upload(
        &self,
        staged: &StagedFile,
        display_name: &str,
        options: &UploadOptions,
    ) -> Result<RemoteUpload, RemoteUploadError>;

    /// Remove a previously uploaded asset.
    async fn delete(&self, file_id: &str) -> Result<(), RemoteUploadError>;

    /// Short provider name for logs and health output.
    fn provider_name(&self) -> &'static str;
}
