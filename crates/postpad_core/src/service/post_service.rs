//! Post use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete entry points for the
//!   request-handling collaborator.
//! - Defend against zero or negative identifiers reaching storage.
//! - Map repository not-found results to use-case errors.
//!
//! # Invariants
//! - Field-level presence validation (non-empty title/content) happens
//!   upstream; this layer never re-checks it.
//! - Read-backs after a successful write must find the written post.

use crate::model::post::{PostDetail, PostDraft, PostId, PostUpdate};
use crate::repo::post_repo::{PostRepository, RepoError};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for post use-cases.
#[derive(Debug)]
pub enum PostServiceError {
    /// Identifier is zero or negative.
    InvalidId(PostId),
    /// Target post does not exist.
    PostNotFound(PostId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for PostServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(id) => write!(f, "invalid post id: {id}"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent post state: {details}"),
        }
    }
}

impl Error for PostServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PostServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::PostNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Post service facade over repository implementations.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one post with its tag labels.
    ///
    /// Labels are normalized (trimmed, lower-cased, deduplicated) by the
    /// repository before persistence; the returned detail carries the
    /// stored lower-cased set.
    pub fn create(&mut self, draft: &PostDraft) -> Result<PostDetail, PostServiceError> {
        self.repo.create_post(draft).map_err(|err| {
            error!("event=post_create module=service status=error error={err}");
            PostServiceError::from(err)
        })
    }

    /// Gets one post with its assembled display tag list.
    pub fn get(&self, id: PostId) -> Result<PostDetail, PostServiceError> {
        require_valid_id(id)?;
        let detail = self.repo.get_post(id, true).map_err(|err| {
            error!("event=post_get module=service status=error post_id={id} error={err}");
            PostServiceError::from(err)
        })?;
        detail.ok_or(PostServiceError::PostNotFound(id))
    }

    /// Lists every post. An empty store yields an empty list.
    pub fn get_all(&self) -> Result<Vec<PostDetail>, PostServiceError> {
        self.repo.list_posts().map_err(|err| {
            error!("event=post_list module=service status=error error={err}");
            PostServiceError::from(err)
        })
    }

    /// Replaces one post's title, content and full tag set, returning the
    /// stored state read back with display formatting.
    pub fn update_by_id(&mut self, update: &PostUpdate) -> Result<PostDetail, PostServiceError> {
        require_valid_id(update.id)?;
        self.repo.update_post(update).map_err(|err| {
            error!(
                "event=post_update module=service status=error post_id={} error={err}",
                update.id
            );
            PostServiceError::from(err)
        })?;

        self.repo
            .get_post(update.id, true)?
            .ok_or(PostServiceError::InconsistentState(
                "updated post not found in read-back",
            ))
    }

    /// Deletes one post and its tag links. Shared tag rows stay behind.
    pub fn delete_by_id(&mut self, id: PostId) -> Result<(), PostServiceError> {
        require_valid_id(id)?;
        self.repo.delete_post(id).map_err(|err| {
            error!("event=post_delete module=service status=error post_id={id} error={err}");
            PostServiceError::from(err)
        })
    }
}

fn require_valid_id(id: PostId) -> Result<(), PostServiceError> {
    if id <= 0 {
        return Err(PostServiceError::InvalidId(id));
    }
    Ok(())
}
