//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - Registry entries stay sorted by version; the applied version is
//!   mirrored to `PRAGMA user_version`.
//! - A database from a newer binary is refused, never downgraded.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const MIGRATIONS: &[(u32, &str)] = &[(1, include_str!("0001_init.sql"))];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Applies every migration newer than the database's recorded version,
/// all inside one transaction.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let applied = schema_version(conn)?;
    let latest = latest_version();

    if applied > latest {
        return Err(DbError::SchemaAhead {
            found: applied,
            supported: latest,
        });
    }
    if applied == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in MIGRATIONS.iter().filter(|(version, _)| *version > applied) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}
