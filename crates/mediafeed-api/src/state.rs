//! Application state shared by all handlers.

use std::sync::Arc;

use mediafeed_core::Config;
use mediafeed_db::PostStore;

use crate::services::{FeedService, UploadService};

pub struct AppState {
    pub config: Config,
    pub posts: Arc<dyn PostStore>,
    pub upload: UploadService,
    pub feed: FeedService,
}

impl AppState {
    pub fn new(config: Config, posts: Arc<dyn PostStore>, upload: UploadService) -> Self {
        let feed = FeedService::new(posts.clone());
        Self {
            config,
            posts,
            upload,
            feed,
        }
    }
}
