//! Mediafeed Database Library
//!
//! Data access for posts: the [`PostStore`](db::PostStore) abstraction, its
//! PostgreSQL implementation, and an in-memory store for tests.

pub mod db;

pub use db::{PostRepository, PostStore};

#[cfg(any(test, feature = "test-helpers"))]
pub use db::InMemoryPostStore;
