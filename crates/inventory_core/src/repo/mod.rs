//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define one repository contract per document collection.
//! - Isolate SQLite and JSON encoding details from service orchestration.
//!
//! # Invariants
//! - Each collection is one table: indexed key columns plus the full JSON
//!   document.
//! - Writes are conditional on the stored `version` and bump it by one.
//! - Repository APIs return semantic errors (`Conflict`, `Duplicate`,
//!   `Referenced`) in addition to DB transport errors.

pub mod class_repo;
pub(crate) mod document;
pub mod domain_repo;
pub mod element_repo;

use crate::db::DbError;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all catalog collections.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Conditional write did not match the stored version.
    Conflict {
        collection: &'static str,
        id: String,
        expected: i64,
        actual: i64,
    },
    /// Target document vanished between read and write.
    NotFound {
        collection: &'static str,
        id: String,
    },
    /// Unique key already taken by another document.
    Duplicate {
        collection: &'static str,
        key: String,
    },
    /// Document is still referenced by another collection.
    Referenced {
        collection: &'static str,
        id: String,
    },
    /// Element names a tag id the stored domain no longer has.
    UnknownTag { domain_id: String, tag_id: String },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted document cannot be decoded.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Conflict {
                collection,
                id,
                expected,
                actual,
            } => write!(
                f,
                "{collection} document {id} is at version {actual}, expected {expected}"
            ),
            Self::NotFound { collection, id } => write!(f, "{collection} document not found: {id}"),
            Self::Duplicate { collection, key } => {
                write!(f, "{collection} key already exists: {key}")
            }
            Self::Referenced { collection, id } => {
                write!(f, "{collection} document {id} is still referenced")
            }
            Self::UnknownTag { domain_id, tag_id } => {
                write!(f, "tag {tag_id} does not exist in domain {domain_id}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted document: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
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

/// Maps SQLite constraint failures onto semantic repository errors.
///
/// `UNIQUE` violations become `Duplicate { key }` and foreign key violations
/// become `Referenced { id }`. Other errors pass through as `Db`.
pub(crate) fn map_constraint(
    err: rusqlite::Error,
    collection: &'static str,
    key: &str,
) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            return match failure.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => RepoError::Duplicate {
                    collection,
                    key: key.to_string(),
                },
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => RepoError::Referenced {
                    collection,
                    id: key.to_string(),
                },
                _ => RepoError::from(err),
            };
        }
    }
    RepoError::from(err)
}
