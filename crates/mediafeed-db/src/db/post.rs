//! Post repository: insert and feed queries for the posts table.

use mediafeed_core::models::{NewPost, Post};
use mediafeed_core::AppError;
use sqlx::{PgPool, Postgres};

/// Trait for post persistence
/// This abstracts the database implementation (PostgreSQL)
#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post and return it with the generated `id` and `created_at`.
    async fn create(&self, post: NewPost) -> Result<Post, AppError>;

    /// All posts, most recent first. Ties on `created_at` are ordered by `id`.
    async fn list_newest_first(&self) -> Result<Vec<Post>, AppError>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostStore for PostRepository {
    #[tracing::instrument(skip(self, post), fields(
        db.system = "postgresql",
        db.table = "posts",
        db.operation = "insert",
        file_name = %post.file_name
    ))]
    async fn create(&self, post: NewPost) -> Result<Post, AppError> {
        // Single statement, so the insert and the read back of generated
        // columns are atomic.
        let created = sqlx::query_as::<Postgres, Post>(
            r#"
            INSERT INTO posts (caption, url, file_type, file_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, caption, url, file_type, file_name, created_at
            "#,
        )
        .bind(&post.caption)
        .bind(&post.url)
        .bind(post.file_type)
        .bind(&post.file_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to insert post");
            AppError::Database(e)
        })?;

        tracing::debug!(post_id = %created.id, "Post created");
        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "posts",
        db.operation = "select"
    ))]
    async fn list_newest_first(&self) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<Postgres, Post>(
            r#"
            SELECT id, caption, url, file_type, file_name, created_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = posts.len(), "Feed loaded");
        Ok(posts)
    }

    #[tracing::instrument(skip(self), fields(db.system = "postgresql"))]
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
