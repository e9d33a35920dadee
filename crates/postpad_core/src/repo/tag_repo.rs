//! Tag resolution, normalization and read-side tag queries.
//!
//! # Responsibility
//! - Map a normalized label to a stable tag id, creating the row when
//!   absent (`resolve_tag`).
//! - Provide tag lookups by id and label for callers and tests.
//! - Own label normalization and display formatting rules.
//!
//! # Invariants
//! - Labels are compared and stored lower-cased; `tag.label` is unique.
//! - Resolving an existing label performs no write.
//! - A lost insert race is retried as a re-query inside the same
//!   transaction before surfacing `RepoError::TagConflict`.

use crate::model::tag::{Tag, TagId};
use crate::repo::post_repo::{RepoError, RepoResult};
use log::warn;
use rusqlite::Connection;
use std::collections::BTreeSet;

/// Normalizes one raw label: trim plus lower-case.
///
/// Returns `None` for labels that are empty after trimming; such values
/// are dropped from write sets rather than rejected.
pub fn normalize_label(label: &str) -> Option<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates a label set, sorted ascending.
pub fn normalize_labels(labels: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for label in labels {
        if let Some(value) = normalize_label(label) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

/// Formats a stored lower-case label for display.
///
/// The first alphabetic character of each whitespace-separated word is
/// upper-cased: `"tags1"` becomes `"Tags1"`.
pub fn display_label(label: &str) -> String {
    let mut formatted = String::with_capacity(label.len());
    let mut at_word_start = true;
    for ch in label.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            formatted.push(ch);
        } else if at_word_start {
            formatted.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            formatted.push(ch);
        }
    }
    formatted
}

/// Resolves a normalized label to its stable tag id, inserting the tag
/// row when no match exists.
///
/// The label must already be lower-cased by the caller. Must run on the
/// same transaction as any junction write that uses the returned id
/// (pass the `Transaction`, which derefs to `Connection`). When the
/// insert loses a uniqueness race to a concurrent writer the label is
/// re-queried once; a re-query miss surfaces as `TagConflict` so the
/// caller can retry instead of treating it as a fatal storage error.
pub fn resolve_tag(conn: &Connection, label: &str) -> RepoResult<TagId> {
    if let Some(id) = find_tag_id(conn, label)? {
        return Ok(id);
    }

    match conn.execute("INSERT INTO tag (label) VALUES (?1);", [label]) {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(err) if is_unique_violation(&err) => {
            warn!("event=tag_resolve module=repo status=lost_insert_race label={label}");
            match find_tag_id(conn, label)? {
                Some(id) => Ok(id),
                None => Err(RepoError::TagConflict(label.to_string())),
            }
        }
        Err(err) => Err(err.into()),
    }
}

fn find_tag_id(conn: &Connection, label: &str) -> RepoResult<Option<TagId>> {
    let mut stmt = conn.prepare("SELECT id FROM tag WHERE label = ?1;")?;
    let mut rows = stmt.query([label])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(row.get(0)?));
    }
    Ok(None)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Read-side repository interface for tag rows.
pub trait TagRepository {
    /// Gets one tag by id. Missing rows are `Ok(None)`, not an error.
    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>>;
    /// Finds one tag by label after normalizing the input.
    fn find_tag_by_label(&self, label: &str) -> RepoResult<Option<Tag>>;
    /// Returns all known labels sorted ascending.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed tag read repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, label FROM tag WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(Tag {
                id: row.get("id")?,
                label: row.get("label")?,
            }));
        }
        Ok(None)
    }

    fn find_tag_by_label(&self, label: &str) -> RepoResult<Option<Tag>> {
        let Some(normalized) = normalize_label(label) else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare("SELECT id, label FROM tag WHERE label = ?1;")?;
        let mut rows = stmt.query([normalized.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(Tag {
                id: row.get("id")?,
                label: row.get("label")?,
            }));
        }
        Ok(None)
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT label FROM tag ORDER BY label ASC;")?;
        let mut rows = stmt.query([])?;
        let mut labels = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get("label")?;
            labels.push(value);
        }
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::{display_label, is_unique_violation, normalize_labels, resolve_tag};
    use crate::db::open_db_in_memory;

    #[test]
    fn display_label_title_cases_each_word() {
        assert_eq!(display_label("tags1"), "Tags1");
        assert_eq!(display_label("rust lang"), "Rust Lang");
        assert_eq!(display_label(""), "");
    }

    #[test]
    fn normalize_labels_deduplicates_case_insensitively_and_sorts() {
        let labels = vec![
            "Work".to_string(),
            "IMPORTANT".to_string(),
            "work".to_string(),
            "  ".to_string(),
        ];
        assert_eq!(
            normalize_labels(&labels),
            vec!["important".to_string(), "work".to_string()]
        );
    }

    #[test]
    fn resolve_tag_reuses_existing_row() {
        let conn = open_db_in_memory().unwrap();
        let first = resolve_tag(&conn, "shared").unwrap();
        let second = resolve_tag(&conn, "shared").unwrap();
        assert_eq!(first, second);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tag;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn duplicate_label_insert_is_detected_as_unique_violation() {
        let conn = open_db_in_memory().unwrap();
        conn.execute("INSERT INTO tag (label) VALUES ('dup');", [])
            .unwrap();
        let err = conn
            .execute("INSERT INTO tag (label) VALUES ('dup');", [])
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }
}
