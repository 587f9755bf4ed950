use std::sync::Arc;
use std::time::Duration;

use mediafeed_core::Config;

use crate::{ImageKitClient, RemoteMediaHost, RemoteUploadError, StagingError, StagingStore};

/// Create the remote media host based on configuration
pub fn create_media_host(config: &Config) -> Result<Arc<dyn RemoteMediaHost>, RemoteUploadError> {
    let client = ImageKitClient::new(
        config.imagekit_private_key(),
        config.imagekit_upload_endpoint(),
        config.imagekit_api_endpoint(),
        Duration::from_secs(config.remote_timeout_seconds()),
    )?;

    tracing::info!(
        provider = client.provider_name(),
        upload_endpoint = %config.imagekit_upload_endpoint(),
        "Remote media host configured"
    );

    Ok(Arc::new(client))
}

/// Create the staging store in the configured temporary-storage area
pub async fn create_staging_store(config: &Config) -> Result<StagingStore, StagingError> {
    StagingStore::new(config.staging_dir().clone()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn config_with(staging_dir: &str) -> Config {
        let vars: HashMap<&str, String> = [
            ("DATABASE_URL", "postgres://localhost/mediafeed".to_string()),
            ("IMAGEKIT_PRIVATE_KEY", "private_test_key".to_string()),
            ("STAGING_DIR", staging_dir.to_string()),
        ]
        .into_iter()
        .collect();
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_create_media_host() {
        let config = config_with("/tmp");
        let host = create_media_host(&config).unwrap();
        assert_eq!(host.provider_name(), "imagekit");
    }

    #[tokio::test]
    async fn test_create_staging_store_creates_directory() {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("staging");
        let config = config_with(staging.to_str().unwrap());

        let store = create_staging_store(&config).await.unwrap();
        assert_eq!(store.dir(), staging.as_path());
        assert!(staging.is_dir());
    }
}
