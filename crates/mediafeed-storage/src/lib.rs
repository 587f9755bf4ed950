//! Mediafeed Storage Library
//!
//! Local staging of incoming uploads and the contract for the remote media host
//! that durably stores them.
//!
//! - [`StagingStore`] writes an upload to a uniquely named file in the shared
//!   temporary-storage area and hands out a [`StagedFile`] guard that removes the
//!   file on release or drop.
//! - [`RemoteMediaHost`] is the capability used to forward a staged file; the
//!   ImageKit adapter is the production implementation.

pub mod factory;
pub mod imagekit;
pub mod remote;
pub mod staging;

// Re-export commonly used types
pub use factory::{create_media_host, create_staging_store};
pub use imagekit::ImageKitClient;
pub use remote::{RemoteMediaHost, RemoteUpload, RemoteUploadError, UploadOptions};
pub use staging::{StagedFile, StagingError, StagingStore};
