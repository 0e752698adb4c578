//! CLI-level errors and their `{code, message}` rendering.

use inventory_core::error::{CODE_STORAGE, CODE_VALIDATION};
use inventory_core::{DbError, InventoryError, LoggingError};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    /// Config file or environment could not be loaded.
    Config(String),
    Logging(LoggingError),
    Db(DbError),
    /// Payload is not valid JSON for the command.
    Payload(serde_json::Error),
    Catalog(InventoryError),
}

/// Error body printed to stderr.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: i32,
    pub message: String,
}

impl CliError {
    /// Catalog codes pass through; payload errors count as validation.
    pub fn code(&self) -> i32 {
        match self {
            Self::Catalog(err) => err.code(),
            Self::Payload(_) => CODE_VALIDATION,
            Self::Config(_) | Self::Logging(_) | Self::Db(_) => CODE_STORAGE,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(message) => write!(f, "configuration error: {message}"),
            Self::Logging(err) => write!(f, "logging error: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Payload(err) => write!(f, "invalid payload: {err}"),
            Self::Catalog(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(_) => None,
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Payload(err) => Some(err),
            Self::Catalog(err) => Some(err),
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value)
    }
}

impl From<InventoryError> for CliError {
    fn from(value: InventoryError) -> Self {
        Self::Catalog(value)
    }
}

impl From<inventory_core::RepoError> for CliError {
    fn from(value: inventory_core::RepoError) -> Self {
        Self::Catalog(value.into())
    }
}
