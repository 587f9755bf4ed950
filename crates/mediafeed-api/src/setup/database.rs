//! Database setup and initialization

use anyhow::{Context, Result};
use mediafeed_core::Config;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Schema migrations, compiled into the binary from the workspace `migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    // Creates the posts table if absent.
    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posts_migration_is_embedded() {
        let migration = MIGRATOR
            .iter()
            .find(|m| m.description == "create posts")
            .expect("create posts migration");

        assert_eq!(migration.version, 20240101000000);
        assert!(migration.sql.contains("CREATE TABLE IF NOT EXISTS posts"));
        assert!(migration.sql.contains("post_file_type"));
    }
}
