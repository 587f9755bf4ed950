//! Feed reader: every post, newest first, projected for the client.

use std::sync::Arc;

use mediafeed_core::models::{FeedResponse, PostView};
use mediafeed_core::AppError;
use mediafeed_db::PostStore;

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostStore>,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    pub async fn list_feed(&self) -> Result<FeedResponse, AppError> {
        let posts = self.posts.list_newest_first().await?;
        Ok(FeedResponse {
            posts: posts.into_iter().map(PostView::from).collect(),
        })
    }
}
