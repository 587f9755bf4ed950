//! Database repositories for data access layer
//
// Post repository (the only persisted entity)
pub mod post;
//
// In-memory implementation used by tests
#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;

pub use post::{PostRepository, PostStore};

#[cfg(any(test, feature = "test-helpers"))]
pub use memory::InMemoryPostStore;
