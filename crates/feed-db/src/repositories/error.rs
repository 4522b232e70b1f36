//! sqlx error -> DomainError mapping

use feed_core::{DomainError, ReactableRef};
use sqlx::Error as SqlxError;

/// SQLSTATE serialization_failure
const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE deadlock_detected
const DEADLOCK_DETECTED: &str = "40P01";

pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => on_unique(),
        _ => map_db_error(e),
    }
}

/// Errors raised inside a toggle transaction. Serialization failures and
/// deadlocks mean another writer got there first.
pub fn map_toggle_error(e: SqlxError, target: ReactableRef) -> DomainError {
    let code = e
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code.into_owned());

    match code.as_deref() {
        Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED) => DomainError::ReactionConflict(target),
        _ => map_db_error(e),
    }
}
