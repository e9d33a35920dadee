//! Domain model for posts and their shared tags.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep write inputs and the read model as separate shapes.
//!
//! # Invariants
//! - Every post is identified by a store-assigned monotonic `PostId`.
//! - Tag labels are stored lower-cased and unique across all tags.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod post;
pub mod tag;
