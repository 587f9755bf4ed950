//! Mediafeed API Library
//!
//! This crate provides the HTTP handlers, the upload and feed services, and
//! application setup.

// Module declarations
mod api_doc;
mod handlers;
mod middleware;
mod telemetry;

// Public modules
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::{FeedService, UploadService};
pub use state::AppState;
