//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod media_host;
pub mod routes;
pub mod server;
pub mod validation;

use crate::services::UploadService;
use crate::state::AppState;
use anyhow::{Context, Result};
use mediafeed_core::Config;
use mediafeed_db::{PostRepository, PostStore};
use mediafeed_storage::{RemoteMediaHost, StagingStore, UploadOptions};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    // Setup database
    let pool = database::setup_database(&config).await?;
    let posts: Arc<dyn PostStore> = Arc::new(PostRepository::new(pool));

    // Setup staging area and remote media host
    let (staging, host) = media_host::setup_media_host(&config).await?;

    let state = build_state(config, posts, staging, host);
    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}

/// Wire services over the given collaborators.
pub fn build_state(
    config: Config,
    posts: Arc<dyn PostStore>,
    staging: StagingStore,
    host: Arc<dyn RemoteMediaHost>,
) -> Arc<AppState> {
    let options = UploadOptions::tagged(config.upload_tag())
        .with_folder(config.imagekit_folder().map(String::from));
    let upload = UploadService::new(staging, host, posts.clone(), options);

    Arc::new(AppState::new(config, posts, upload))
}
