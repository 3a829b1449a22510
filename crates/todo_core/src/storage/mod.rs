//! Durable key-value storage and the todo persistence adapter.
//!
//! # Responsibility
//! - Provide a local-storage style facility (one key -> one text blob).
//! - Serialize the whole todo collection to one fixed key and back.
//!
//! # Invariants
//! - Writes are whole-value overwrites; the last writer wins.
//! - Storage failures are reported as `StorageError`, never as panics.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv;
pub mod todo_storage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence failure. Callers treat it as non-fatal.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Connection schema is older/newer than this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    Serialize(serde_json::Error),
    /// Stored blob exists but does not have the expected shape.
    Corrupted(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::Serialize(err) => write!(f, "failed to serialize todos: {err}"),
            Self::Corrupted(message) => write!(f, "stored todos are unreadable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::UninitializedConnection { .. } | Self::Corrupted(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
