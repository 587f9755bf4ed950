use std::sync::Arc;

use axum::{extract::State, Json};
use mediafeed_core::models::FeedResponse;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// List all posts, newest first
#[utoipa::path(
    get,
    path = "/feed",
    tag = "posts",
    responses(
        (status = 200, description = "All posts, newest first", body = FeedResponse),
        (status = 500, description = "Failed to load the feed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_feed"))]
pub async fn get_feed(State(state): State<Arc<AppState>>) -> Result<Json<FeedResponse>, HttpAppError> {
    let feed = state.feed.list_feed().await?;
    Ok(Json(feed))
}
