//! Data models for the application

mod post;

pub use post::*;
