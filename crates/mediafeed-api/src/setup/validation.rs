//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use mediafeed_core::Config;

/// Validate critical configuration values
///
/// Fails fast on values that would only surface later as failed uploads or an
/// unreachable server.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server_port() == 0 {
        return Err(anyhow::anyhow!("PORT cannot be 0"));
    }

    // Validate database connection settings
    if config.database_url().trim().is_empty() {
        return Err(anyhow::anyhow!("DATABASE_URL cannot be empty"));
    }

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    // Validate CORS configuration in production
    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production - this is a security risk. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    // Validate remote media host settings
    if config.imagekit_private_key().trim().is_empty() {
        return Err(anyhow::anyhow!("IMAGEKIT_PRIVATE_KEY cannot be empty"));
    }

    for (name, endpoint) in [
        ("IMAGEKIT_UPLOAD_ENDPOINT", config.imagekit_upload_endpoint()),
        ("IMAGEKIT_API_ENDPOINT", config.imagekit_api_endpoint()),
    ] {
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(anyhow::anyhow!(
                "{} must be an http(s) URL, got '{}'",
                name,
                endpoint
            ));
        }
        if config.is_production() && endpoint.starts_with("http://") {
            tracing::warn!(name, endpoint, "Remote media host endpoint is not using TLS");
        }
    }

    if config.remote_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("REMOTE_TIMEOUT_SECONDS cannot be 0"));
    }

    // Validate upload settings
    if config.max_upload_size_bytes() == 0 {
        return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
    }

    if config.upload_tag().trim().is_empty() {
        return Err(anyhow::anyhow!("UPLOAD_TAG cannot be empty"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(extra: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = [
            ("DATABASE_URL", "postgres://localhost/mediafeed"),
            ("IMAGEKIT_PRIVATE_KEY", "private_test_key"),
        ]
        .iter()
        .chain(extra.iter())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&config(&[])).is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases: &[(&str, &str, &str)] = &[
            ("PORT", "0", "PORT"),
            ("DB_MAX_CONNECTIONS", "0", "max connections"),
            ("IMAGEKIT_PRIVATE_KEY", "  ", "IMAGEKIT_PRIVATE_KEY"),
            ("IMAGEKIT_UPLOAD_ENDPOINT", "ftp://upload", "IMAGEKIT_UPLOAD_ENDPOINT"),
            ("IMAGEKIT_API_ENDPOINT", "api.imagekit.io", "IMAGEKIT_API_ENDPOINT"),
            ("REMOTE_TIMEOUT_SECONDS", "0", "REMOTE_TIMEOUT_SECONDS"),
            ("MAX_UPLOAD_SIZE_MB", "0", "MAX_UPLOAD_SIZE_MB"),
            ("UPLOAD_TAG", "", "UPLOAD_TAG"),
        ];

        for &(key, value, expected) in cases {
            let err = validate_config(&config(&[(key, value)])).unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "{key}={value:?} gave unexpected error: {err}"
            );
        }
    }
}
