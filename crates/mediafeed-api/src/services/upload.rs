//! Upload pipeline
//!
//! stage → remote upload → persist, with the staged file released on every
//! exit path. A post is only written after the remote host accepted the file,
//! and every failure reaches the caller as one [`UploadError`].

use std::sync::Arc;

use mediafeed_core::models::{FileType, NewPost, Post};
use mediafeed_core::{UploadError, UploadStage};
use mediafeed_db::PostStore;
use mediafeed_storage::{RemoteMediaHost, RemoteUpload, StagedFile, StagingStore, UploadOptions};
use tokio::io::AsyncRead;

/// Orchestrates one upload from the incoming byte stream to a persisted post.
#[derive(Clone)]
pub struct UploadService {
    staging: StagingStore,
    host: Arc<dyn RemoteMediaHost>,
    posts: Arc<dyn PostStore>,
    options: UploadOptions,
}

impl UploadService {
    pub fn new(
        staging: StagingStore,
        host: Arc<dyn RemoteMediaHost>,
        posts: Arc<dyn PostStore>,
        options: UploadOptions,
    ) -> Self {
        Self {
            staging,
            host,
            posts,
            options,
        }
    }

    /// Run the whole pipeline for one upload.
    pub async fn handle_upload<R>(
        &self,
        reader: R,
        content_type: &str,
        original_file_name: &str,
        caption: String,
    ) -> Result<Post, UploadError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let staged = self.stage(reader, original_file_name).await?;
        self.complete_upload(staged, content_type, original_file_name, caption)
            .await
    }

    /// Write the incoming stream to a staged file.
    ///
    /// Split out so the multipart handler can stage the file part as it
    /// arrives and finish once the remaining form fields are read.
    pub async fn stage<R>(&self, reader: R, original_file_name: &str) -> Result<StagedFile, UploadError>
    where
        R: AsyncRead + Unpin + Send,
    {
        self.staging
            .stage(reader, original_file_name)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to stage upload");
                UploadError::new(UploadStage::Staging, e)
            })
    }

    /// Upload a staged file, persist the post, and release the staged file.
    #[tracing::instrument(
        skip(self, staged, caption),
        fields(size_bytes = staged.size_bytes(), provider = self.host.provider_name())
    )]
    pub async fn complete_upload(
        &self,
        staged: StagedFile,
        content_type: &str,
        original_file_name: &str,
        caption: String,
    ) -> Result<Post, UploadError> {
        let result = self
            .upload_and_persist(&staged, content_type, original_file_name, caption)
            .await;

        if let Err(e) = staged.release().await {
            tracing::warn!(error = %e, "Failed to release staged file");
        }

        match &result {
            Ok(post) => tracing::info!(
                post_id = %post.id,
                file_type = post.file_type.as_str(),
                file_name = %post.file_name,
                "Upload completed"
            ),
            Err(e) => tracing::warn!(stage = %e.stage, error = %e, "Upload failed"),
        }

        result
    }

    async fn upload_and_persist(
        &self,
        staged: &StagedFile,
        content_type: &str,
        original_file_name: &str,
        caption: String,
    ) -> Result<Post, UploadError> {
        let remote = self
            .host
            .upload(staged, original_file_name, &self.options)
            .await
            .map_err(|e| UploadError::new(UploadStage::RemoteUpload, e))?;

        let new_post = NewPost {
            caption,
            url: remote.url.clone(),
            file_type: FileType::from_content_type(content_type),
            file_name: remote.name.clone(),
        };

        match self.posts.create(new_post).await {
            Ok(post) => Ok(post),
            Err(e) => {
                self.discard_remote(&remote).await;
                Err(UploadError::new(UploadStage::Persistence, e))
            }
        }
    }

    /// Best-effort removal of an asset whose post could not be saved.
    async fn discard_remote(&self, remote: &RemoteUpload) {
        match self.host.delete(&remote.file_id).await {
            Ok(()) => tracing::info!(
                file_id = %remote.file_id,
                "Removed remote asset after failed persistence"
            ),
            Err(e) => tracing::warn!(
                file_id = %remote.file_id,
                url = %remote.url,
                error = %e,
                "Failed to remove remote asset after failed persistence; asset is orphaned"
            ),
        }
    }
}
