//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide post CRUD on top of the `post`, `tag` and `post_tag` tables.
//! - Drive tag resolution and junction replacement inside one immediate
//!   transaction per write.
//! - Reconstruct a post's ordered display tag list on read paths.
//!
//! # Invariants
//! - A failed write rolls back every row it touched, including the post
//!   row itself on create.
//! - Junction rows are replaced wholesale on update (delete then
//!   recreate), never diffed.
//! - Post deletion removes junction rows but never tag rows.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::db::DbError;
use crate::model::post::{Post, PostDetail, PostDraft, PostId, PostUpdate};
use crate::model::tag::TagId;
use crate::repo::tag_repo::{display_label, normalize_labels, resolve_tag};
use crate::repo::tx::with_immediate_tx;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for post/tag persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying storage failure, including constraint violations other
    /// than the expected tag-label race.
    Db(DbError),
    /// Requested post does not exist.
    NotFound(PostId),
    /// Tag-label uniqueness race that survived the in-transaction
    /// re-query; retryable by the caller.
    TagConflict(String),
    /// Persisted state failed a read-side consistency check.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "post not found: {id}"),
            Self::TagConflict(label) => {
                write!(f, "conflicting concurrent writes for tag label `{label}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted post data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::TagConflict(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for post CRUD operations.
pub trait PostRepository {
    /// Creates one post and attaches its deduplicated label set
    /// atomically. Returns the stored shape with lower-cased labels.
    fn create_post(&mut self, draft: &PostDraft) -> RepoResult<PostDetail>;
    /// Gets one post by id. `with_tags` controls tag assembly; shallow
    /// reads return an empty tag list.
    fn get_post(&self, id: PostId, with_tags: bool) -> RepoResult<Option<PostDetail>>;
    /// Lists every post with assembled tags, ordered by id.
    fn list_posts(&self) -> RepoResult<Vec<PostDetail>>;
    /// Replaces title, content and the full tag set atomically.
    fn update_post(&mut self, update: &PostUpdate) -> RepoResult<()>;
    /// Deletes the post and its junction rows. Tag rows stay.
    fn delete_post(&mut self, id: PostId) -> RepoResult<()>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&mut self, draft: &PostDraft) -> RepoResult<PostDetail> {
        let labels = normalize_labels(&draft.tags);

        let post_id = with_immediate_tx(self.conn, "post_create", |tx| {
            tx.execute(
                "INSERT INTO post (title, content) VALUES (?1, ?2);",
                params![draft.title, draft.content],
            )?;
            let post_id = tx.last_insert_rowid();

            for label in &labels {
                let tag_id = resolve_tag(tx, label)?;
                attach_tag(tx, post_id, tag_id)?;
            }

            Ok(post_id)
        })?;

        Ok(PostDetail {
            id: post_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            tags: labels,
        })
    }

    fn get_post(&self, id: PostId, with_tags: bool) -> RepoResult<Option<PostDetail>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, content FROM post WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            let post = parse_post_row(row)?;
            let tags = if with_tags {
                load_tags_for_post(self.conn, post.id)?
            } else {
                Vec::new()
            };
            return Ok(Some(PostDetail::from_parts(post, tags)));
        }

        Ok(None)
    }

    fn list_posts(&self) -> RepoResult<Vec<PostDetail>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, content FROM post ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            let post = parse_post_row(row)?;
            let tags = load_tags_for_post(self.conn, post.id)?;
            posts.push(PostDetail::from_parts(post, tags));
        }

        Ok(posts)
    }

    fn update_post(&mut self, update: &PostUpdate) -> RepoResult<()> {
        if !post_exists(self.conn, update.id)? {
            return Err(RepoError::NotFound(update.id));
        }

        let labels = normalize_labels(&update.tags);

        with_immediate_tx(self.conn, "post_update", |tx| {
            let changed = tx.execute(
                "UPDATE post SET title = ?2, content = ?3 WHERE id = ?1;",
                params![update.id, update.title, update.content],
            )?;
            // Row can vanish between the existence check and the
            // transaction start.
            if changed == 0 {
                return Err(RepoError::NotFound(update.id));
            }

            detach_all_tags(tx, update.id)?;
            for label in &labels {
                let tag_id = resolve_tag(tx, label)?;
                attach_tag(tx, update.id, tag_id)?;
            }

            Ok(())
        })
    }

    fn delete_post(&mut self, id: PostId) -> RepoResult<()> {
        if !post_exists(self.conn, id)? {
            return Err(RepoError::NotFound(id));
        }

        with_immediate_tx(self.conn, "post_delete", |tx| {
            detach_all_tags(tx, id)?;
            let changed = tx.execute("DELETE FROM post WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }
            Ok(())
        })
    }
}

/// Inserts one junction row linking a post to a resolved tag.
///
/// Assumes both rows exist; sequencing is the caller's responsibility
/// and foreign keys reject anything else.
fn attach_tag(conn: &Connection, post_id: PostId, tag_id: TagId) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO post_tag (post_id, tag_id) VALUES (?1, ?2);",
        params![post_id, tag_id],
    )?;
    Ok(())
}

/// Deletes every junction row for the post. Zero rows is a no-op.
fn detach_all_tags(conn: &Connection, post_id: PostId) -> RepoResult<()> {
    conn.execute("DELETE FROM post_tag WHERE post_id = ?1;", [post_id])?;
    Ok(())
}

/// Reconstructs the display tag list for one post: junction join,
/// ascending label sort, title-case formatting. Always returns a
/// (possibly empty) list.
fn load_tags_for_post(conn: &Connection, post_id: PostId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT tag.label
         FROM post_tag
         INNER JOIN tag ON tag.id = post_tag.tag_id
         WHERE post_tag.post_id = ?1
         ORDER BY tag.label ASC;",
    )?;
    let mut rows = stmt.query([post_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let label: String = row.get(0)?;
        tags.push(display_label(&label));
    }
    Ok(tags)
}

fn post_exists(conn: &Connection, id: PostId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM post WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let post = Post {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
    };
    if post.title.is_empty() || post.content.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "post {} has empty title or content",
            post.id
        )));
    }
    Ok(post)
}
