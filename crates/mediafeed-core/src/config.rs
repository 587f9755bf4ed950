//! Configuration module
//!
//! Process configuration is read from the environment once at startup and then
//! shared read-only. Getters are the only access path so callers never depend on
//! the field layout.

use std::env;
use std::path::PathBuf;

const SERVER_PORT: u16 = 8000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 100;
const REMOTE_TIMEOUT_SECS: u64 = 120;
const IMAGEKIT_UPLOAD_ENDPOINT: &str = "https://upload.imagekit.io/api/v1/files/upload";
const IMAGEKIT_API_ENDPOINT: &str = "https://api.imagekit.io/v1";
const UPLOAD_TAG: &str = "posts";

/// Settings of the HTTP server and database pool.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    pub log_format: String,
}

/// Settings of the upload pipeline and the remote media host.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub staging_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    pub imagekit_private_key: String,
    pub imagekit_upload_endpoint: String,
    pub imagekit_api_endpoint: String,
    pub imagekit_folder: Option<String>,
    pub upload_tag: String,
    pub remote_timeout_seconds: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    base: BaseConfig,
    upload: UploadConfig,
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), MAX_CONNECTIONS),
            db_timeout_seconds: parse_or(lookup("DB_TIMEOUT_SECONDS"), CONNECTION_TIMEOUT_SECS),
            environment,
            log_format: lookup("LOG_FORMAT")
                .unwrap_or_else(|| "compact".to_string())
                .to_lowercase(),
        };

        let max_upload_size_mb = parse_or(lookup("MAX_UPLOAD_SIZE_MB"), MAX_UPLOAD_SIZE_MB);
        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large: {}", max_upload_size_mb))?;

        let upload = UploadConfig {
            staging_dir: lookup("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            max_upload_size_bytes,
            imagekit_private_key: lookup("IMAGEKIT_PRIVATE_KEY")
                .ok_or_else(|| anyhow::anyhow!("IMAGEKIT_PRIVATE_KEY must be set"))?,
            imagekit_upload_endpoint: lookup("IMAGEKIT_UPLOAD_ENDPOINT")
                .unwrap_or_else(|| IMAGEKIT_UPLOAD_ENDPOINT.to_string()),
            imagekit_api_endpoint: lookup("IMAGEKIT_API_ENDPOINT")
                .unwrap_or_else(|| IMAGEKIT_API_ENDPOINT.to_string()),
            imagekit_folder: lookup("IMAGEKIT_FOLDER").filter(|s| !s.trim().is_empty()),
            upload_tag: lookup("UPLOAD_TAG").unwrap_or_else(|| UPLOAD_TAG.to_string()),
            remote_timeout_seconds: parse_or(lookup("REMOTE_TIMEOUT_SECONDS"), REMOTE_TIMEOUT_SECS),
        };

        Ok(Config { base, upload })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.base.db_timeout_seconds
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.base.log_format
    }

    pub fn staging_dir(&self) -> &PathBuf {
        &self.upload.staging_dir
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.upload.max_upload_size_bytes
    }

    pub fn imagekit_private_key(&self) -> &str {
        &self.upload.imagekit_private_key
    }

    pub fn imagekit_upload_endpoint(&self) -> &str {
        &self.upload.imagekit_upload_endpoint
    }

    pub fn imagekit_api_endpoint(&self) -> &str {
        &self.upload.imagekit_api_endpoint
    }

    pub fn imagekit_folder(&self) -> Option<&str> {
        self.upload.imagekit_folder.as_deref()
    }

    pub fn upload_tag(&self) -> &str {
        &self.upload.upload_tag
    }

    pub fn remote_timeout_seconds(&self) -> u64 {
        self.upload.remote_timeout_seconds
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
