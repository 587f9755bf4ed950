//! Business logic behind the HTTP handlers.

pub mod feed;
pub mod upload;

pub use feed::FeedService;
pub use upload::UploadService;
