//! ImageKit media host
//!
//! Uploads go to the ImageKit upload API as multipart requests authenticated
//! with the account's private key. Upload: https://docs.imagekit.io/api-reference/upload-file-api

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, StatusCode};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::remote::{RemoteMediaHost, RemoteUpload, RemoteUploadError, UploadOptions};
use crate::staging::StagedFile;

/// ImageKit client
pub struct ImageKitClient {
    http_client: reqwest::Client,
    private_key: String,
    upload_endpoint: String,
    api_endpoint: String,
}

impl Debug for ImageKitClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ImageKitClient")
            .field("upload_endpoint", &self.upload_endpoint)
            .field("api_endpoint", &self.api_endpoint)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "fileId")]
    file_id: Option<String>,
    name: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ImageKitClient {
    pub fn new(
        private_key: impl Into<String>,
        upload_endpoint: impl Into<String>,
        api_endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteUploadError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteUploadError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            private_key: private_key.into(),
            upload_endpoint: upload_endpoint.into(),
            api_endpoint: api_endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    async fn build_form(
        staged: &StagedFile,
        display_name: &str,
        options: &UploadOptions,
    ) -> Result<Form, RemoteUploadError> {
        let file = tokio::fs::File::open(staged.path()).await?;
        let length = file.metadata().await?.len();
        let body = Body::wrap_stream(ReaderStream::new(file));

        let mut form = Form::new()
            .part(
                "file",
                Part::stream_with_length(body, length).file_name(display_name.to_string()),
            )
            .text("fileName", display_name.to_string())
            .text("useUniqueFileName", options.use_unique_file_name.to_string());

        if !options.tags.is_empty() {
            form = form.text("tags", options.tags.join(","));
        }
        if let Some(folder) = &options.folder {
            form = form.text("folder", folder.clone());
        }

        Ok(form)
    }
}

/// Turn a non-success response into `Rejected`, preferring the host's own message.
async fn rejection(response: reqwest::Response) -> RemoteUploadError {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or(text);

    RemoteUploadError::Rejected { status, message }
}

#[async_trait]
impl RemoteMediaHost for ImageKitClient {
    #[tracing::instrument(skip(self, staged, options), fields(size_bytes = staged.size_bytes()))]
    async fn upload(
        &self,
        staged: &StagedFile,
        display_name: &str,
        options: &UploadOptions,
    ) -> Result<RemoteUpload, RemoteUploadError> {
        let start = std::time::Instant::now();
        let form = Self::build_form(staged, display_name, options).await?;

        let response = self
            .http_client
            .post(&self.upload_endpoint)
            .basic_auth(&self.private_key, Some(""))
            .multipart(form)
            .send()
            .await
            .map_err(|e| RemoteUploadError::Transport(e.to_string()))?;

        // Only a plain 200 counts as a stored asset.
        if response.status() != StatusCode::OK {
            let err = rejection(response).await;
            tracing::warn!(error = %err, "ImageKit upload rejected");
            return Err(err);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| RemoteUploadError::InvalidResponse(e.to_string()))?;

        let url = body.url.ok_or(RemoteUploadError::MissingField("url"))?;
        let name = body.name.ok_or(RemoteUploadError::MissingField("name"))?;
        let file_id = body.file_id.ok_or(RemoteUploadError::MissingField("fileId"))?;

        tracing::info!(
            url = %url,
            name = %name,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ImageKit upload successful"
        );

        Ok(RemoteUpload { url, name, file_id })
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, file_id: &str) -> Result<(), RemoteUploadError> {
        let url = format!("{}/files/{}", self.api_endpoint, file_id);

        let response = self
            .http_client
            .delete(&url)
            .basic_auth(&self.private_key, Some(""))
            .send()
            .await
            .map_err(|e| RemoteUploadError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        tracing::info!(file_id = %file_id, "ImageKit asset deleted");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "imagekit"
    }
}
