//! Store error taxonomy.
//!
//! Every fallible store operation returns [`StoreError`]. The variants are
//! deliberately coarse: the caller only needs to tell apart "the database is
//! unreachable" (retry later), "the schema is not set up" (run migrations),
//! "a constraint fired" and "this store was already closed". Nothing is
//! retried internally.

use sea_orm::{DbErr, SqlErr};

/// Error type for all session-store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database could not be reached, or a connection could not be
    /// acquired from the pool.
    #[error("database connection failed: {0}")]
    Connectivity(String),

    /// An expected table or column is missing — the schema has not been
    /// migrated, or points at the wrong `search_path`.
    #[error("session schema missing or malformed: {0}")]
    Schema(String),

    /// A database constraint rejected a write.
    #[error("constraint violation: {0}")]
    Integrity(String),

    /// The store was used after [`close`](crate::SessionStorage::close).
    #[error("session store is closed")]
    Closed,

    /// Any other error surfaced by the database driver.
    #[error("database error: {0}")]
    Backend(String),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        if let Some(sql_err) = err.sql_err() {
            return match sql_err {
                SqlErr::UniqueConstraintViolation(msg)
                | SqlErr::ForeignKeyConstraintViolation(msg) => StoreError::Integrity(msg),
                _ => StoreError::Backend(err.to_string()),
            };
        }

        match err {
            DbErr::Conn(e) => StoreError::Connectivity(e.to_string()),
            DbErr::ConnectionAcquire(e) => StoreError::Connectivity(e.to_string()),
            DbErr::Exec(e) | DbErr::Query(e) => {
                let msg = e.to_string();
                if mentions_missing_schema_object(&msg) {
                    StoreError::Schema(msg)
                } else {
                    StoreError::Backend(msg)
                }
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Recognizes the driver messages Postgres (`undefined_table`,
/// `undefined_column`) and SQLite emit for missing schema objects.
fn mentions_missing_schema_object(msg: &str) -> bool {
    msg.contains("does not exist")
        || msg.contains("no such table")
        || msg.contains("no such column")
}
