use std::io;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use futures::TryStreamExt;
use mediafeed_core::models::Post;
use mediafeed_core::AppError;
use mediafeed_storage::StagedFile;
use tokio_util::io::StreamReader;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// The file part, already staged, with what the client declared about it.
struct IncomingFile {
    staged: StagedFile,
    file_name: String,
    content_type: String,
}

/// Upload a post
///
/// Streams the `file` part to a staged file as it arrives, then forwards it to
/// the remote media host and records the post. The optional `caption` field
/// may come before or after the file.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "posts",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Post created", body = Post),
        (status = 400, description = "Missing or malformed form data", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload"))]
pub async fn upload_post(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Post>, HttpAppError> {
    let mut incoming: Option<IncomingFile> = None;
    let mut caption = String::new();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if incoming.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    )
                    .into());
                }

                // A part without a filename is a plain form value, not a file.
                let file_name = field
                    .file_name()
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| {
                        AppError::InvalidInput("Field 'file' must be a file upload".to_string())
                    })?
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                tracing::debug!(file_name = %file_name, content_type = %content_type, "Receiving file");

                let reader = StreamReader::new(field.map_err(io::Error::other));
                let staged = state.upload.stage(reader, &file_name).await?;

                incoming = Some(IncomingFile {
                    staged,
                    file_name,
                    content_type,
                });
            }
            "caption" => caption = field.text().await?,
            _ => {}
        }
    }

    let incoming =
        incoming.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    let post = state
        .upload
        .complete_upload(
            incoming.staged,
            &incoming.content_type,
            &incoming.file_name,
            caption,
        )
        .await?;

    Ok(Json(post))
}
