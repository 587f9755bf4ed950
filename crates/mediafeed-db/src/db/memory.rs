//! In-memory post store for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mediafeed_core::models::{NewPost, Post};
use mediafeed_core::AppError;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Post store backed by a vector.
///
/// Timestamps are strictly increasing in insertion order so feed ordering is
/// deterministic even when two inserts land within the same clock tick.
/// Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryPostStore {
    posts: Arc<Mutex<Vec<Post>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `create` calls fail with a persistence error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent reads and pings fail like an exhausted pool.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.posts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.lock().await.is_empty()
    }

    fn next_timestamp(posts: &[Post]) -> DateTime<Utc> {
        let now = Utc::now();
        match posts.iter().map(|p| p.created_at).max() {
            Some(latest) if latest >= now => latest + Duration::microseconds(1),
            _ => now,
        }
    }
}

#[async_trait::async_trait]
impl super::PostStore for InMemoryPostStore {
    async fn create(&self, post: NewPost) -> Result<Post, AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence(
                "simulated insert failure".to_string(),
            ));
        }

        let mut posts = self.posts.lock().await;
        let created = Post {
            id: Uuid::new_v4(),
            caption: post.caption,
            url: post.url,
            file_type: post.file_type,
            file_name: post.file_name,
            created_at: Self::next_timestamp(&posts),
        };
        posts.push(created.clone());
        Ok(created)
    }

    async fn list_newest_first(&self) -> Result<Vec<Post>, AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut posts = self.posts.lock().await.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::PostStore;
    use mediafeed_core::models::FileType;

    fn new_post(name: &str) -> NewPost {
        NewPost {
            caption: format!("caption {name}"),
            url: format!("https://host/{name}"),
            file_type: FileType::Image,
            file_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let store = InMemoryPostStore::new();
        let a = store.create(new_post("a.jpg")).await.unwrap();
        let b = store.create(new_post("b.jpg")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert!(b.created_at > a.created_at);
        assert_eq!(a.file_name, "a.jpg");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = InMemoryPostStore::new();
        for name in ["1.jpg", "2.jpg", "3.jpg"] {
            store.create(new_post(name)).await.unwrap();
        }

        let names: Vec<_> = store
            .list_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.file_name)
            .collect();
        assert_eq!(names, vec!["3.jpg", "2.jpg", "1.jpg"]);
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let store = InMemoryPostStore::new();

        store.fail_writes(true);
        assert!(matches!(
            store.create(new_post("x.jpg")).await,
            Err(AppError::Persistence(_))
        ));
        assert!(store.is_empty().await);

        store.fail_reads(true);
        assert!(matches!(
            store.list_newest_first().await,
            Err(AppError::Database(_))
        ));
        assert!(store.ping().await.is_err());
    }
}
