//! Transaction boundary for multi-step writes.
//!
//! # Responsibility
//! - Run a write sequence inside one immediate transaction, committing on
//!   success and rolling back on any failure.
//!
//! # Invariants
//! - Every exit path releases the transaction: commit on `Ok`, explicit
//!   rollback on `Err`, and scoped rollback via `Transaction`'s drop
//!   guard when the sequence panics mid-flight.
//! - A rollback failure is logged but never masks the original error.

use crate::repo::post_repo::{RepoError, RepoResult};
use log::error;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Runs `f` inside an immediate transaction named `op` for logging.
///
/// Commits when `f` returns `Ok`; otherwise logs the failure under the
/// operation name and rolls back before propagating the error. A panic
/// inside `f` unwinds through this frame and the transaction's drop
/// guard rolls back, so a fault can never leave the connection with a
/// dangling open transaction.
pub fn with_immediate_tx<T, F>(conn: &mut Connection, op: &'static str, f: F) -> RepoResult<T>
where
    F: FnOnce(&Transaction<'_>) -> RepoResult<T>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    match f(&tx) {
        Ok(value) => match tx.commit() {
            Ok(()) => Ok(value),
            Err(err) => {
                error!("event={op} module=repo status=commit_failed error={err}");
                Err(RepoError::from(err))
            }
        },
        Err(err) => {
            error!("event={op} module=repo status=rollback error={err}");
            if let Err(rollback_err) = tx.rollback() {
                error!("event={op} module=repo status=rollback_failed error={rollback_err}");
            }
            Err(err)
        }
    }
}
