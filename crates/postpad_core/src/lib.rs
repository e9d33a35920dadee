//! Core persistence and transaction logic for Postpad.
//! This crate is the single source of truth for post/tag invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::post::{Post, PostDetail, PostDraft, PostId, PostUpdate};
pub use model::tag::{Tag, TagId};
pub use repo::post_repo::{PostRepository, RepoError, RepoResult, SqlitePostRepository};
pub use repo::tag_repo::{
    display_label, normalize_label, normalize_labels, resolve_tag, SqliteTagRepository,
    TagRepository,
};
pub use repo::tx::with_immediate_tx;
pub use service::post_service::{PostService, PostServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
