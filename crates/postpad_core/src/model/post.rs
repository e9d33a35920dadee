//! Post domain model.
//!
//! # Responsibility
//! - Define the canonical post row shape plus write/read projections.
//!
//! # Invariants
//! - `id` is store-assigned and never reused for another post.
//! - `PostDetail::tags` is always present; an untagged post carries an
//!   empty list, never an absent value.

use serde::{Deserialize, Serialize};

/// Stable store-assigned identifier for a post row.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PostId = i64;

/// Canonical post row as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Monotonic store-assigned id.
    pub id: PostId,
    /// Non-empty title text. Presence is validated upstream.
    pub title: String,
    /// Non-empty body text. Presence is validated upstream.
    pub content: String,
}

/// Write input for creating one post with its tag labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    /// Raw labels as supplied by the caller; normalized before persistence.
    pub tags: Vec<String>,
}

/// Write input for replacing one post's fields and full tag set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUpdate {
    pub id: PostId,
    pub title: String,
    pub content: String,
    /// Raw labels; the stored junction set is replaced wholesale.
    pub tags: Vec<String>,
}

/// Read model returned by detail/list use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub id: PostId,
    pub title: String,
    pub content: String,
    /// Tag labels for presentation. Serializes as `[]` when empty.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PostDetail {
    /// Builds a detail record from a post row and its assembled tag list.
    pub fn from_parts(post: Post, tags: Vec<String>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            tags,
        }
    }
}
