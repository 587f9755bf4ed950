//! Staging area and remote media host setup

use anyhow::{Context, Result};
use mediafeed_core::Config;
use mediafeed_storage::{create_media_host, create_staging_store, RemoteMediaHost, StagingStore};
use std::sync::Arc;

/// Prepare the staging directory and build the remote media host client.
pub async fn setup_media_host(config: &Config) -> Result<(StagingStore, Arc<dyn RemoteMediaHost>)> {
    let staging = create_staging_store(config)
        .await
        .context("Failed to prepare staging directory")?;
    tracing::info!(staging_dir = %staging.dir().display(), "Staging area ready");

    let host = create_media_host(config).context("Failed to create remote media host")?;

    Ok((staging, host))
}
