//! Mapping of sqlx failures into [`AppError`].
//!
//! SQLite reports writer contention as `SQLITE_BUSY` (5) or
//! `SQLITE_LOCKED` (6), possibly as an extended code whose low byte is the
//! primary one. Those, and pool acquire timeouts, are transient and become
//! `StorageConflict`. Unique-index violations become `Conflict`.

use sqlx::error::DatabaseError;

use folderhub_core::error::{AppError, ErrorKind};

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Build a `map_err` adapter that classifies a sqlx error.
pub fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| classify(context, err)
}

fn classify(context: &str, err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::PoolTimedOut => AppError::with_source(
            ErrorKind::StorageConflict,
            format!("{context}: timed out waiting for a connection"),
            err,
        ),
        sqlx::Error::Database(ref db_err) if is_contention(&**db_err) => {
            AppError::with_source(
                ErrorKind::StorageConflict,
                format!("{context}: database is busy"),
                err,
            )
        }
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::with_source(
                ErrorKind::Conflict,
                format!("{context}: duplicate entry"),
                err,
            )
        }
        _ => AppError::with_source(ErrorKind::Database, format!("{context}: {err}"), err),
    }
}

fn is_contention(db_err: &dyn DatabaseError) -> bool {
    db_err
        .code()
        .and_then(|code| code.parse::<i32>().ok())
        .map(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_storage_conflict() {
        let err = db_error("Failed to begin transaction")(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind, ErrorKind::StorageConflict);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err = db_error("Failed to load folder")(sqlx::Error::RowNotFound);
        assert_eq!(err.kind, ErrorKind::Database);
        assert!(err.message.starts_with("Failed to load folder"));
    }
}
