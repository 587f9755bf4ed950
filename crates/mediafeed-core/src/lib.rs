//! Mediafeed Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared by the storage, database, and API crates.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel, UploadError, UploadStage};
