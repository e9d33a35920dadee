//! Tag domain model.
//!
//! # Responsibility
//! - Define the shared tag row shape referenced by posts.
//!
//! # Invariants
//! - `label` is stored lower-cased and unique case-insensitively.
//! - Tag rows outlive their referencing posts; post operations never
//!   delete tags.

use serde::{Deserialize, Serialize};

/// Stable store-assigned identifier for a tag row.
pub type TagId = i64;

/// Shared label entity referenced by zero or more posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Store-assigned id.
    pub id: TagId,
    /// Lower-cased unique label.
    pub label: String,
}
