//! Catalog error taxonomy.
//!
//! # Responsibility
//! - Give every use-case failure a stable numeric code for API consumers.
//! - Translate repository errors into semantic catalog errors.
//!
//! # Invariants
//! - Codes never change once published.
//! - `DomainAlreadyExists` and `ClassAlreadyExists` share `-1` with
//!   `Validation`; callers that need to tell them apart match on the variant.

use crate::model::class::ClassId;
use crate::model::domain::{DomainId, TagId};
use crate::model::element::ElementId;
use crate::model::ValidationError;
use crate::repo::document::{CLASSES, DOMAINS};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type InventoryResult<T> = Result<T, InventoryError>;

pub const CODE_VALIDATION: i32 = -1;
pub const CODE_DOMAIN_NOT_FOUND: i32 = -2;
pub const CODE_CLASS_NOT_FOUND: i32 = -3;
pub const CODE_TAG_NOT_FOUND: i32 = -4;
pub const CODE_ELEMENT_NOT_FOUND: i32 = -5;
pub const CODE_CONFLICT: i32 = -6;
pub const CODE_CLASS_IN_USE: i32 = -7;
pub const CODE_STORAGE: i32 = -100;

/// Use-case level error returned by every catalog service.
#[derive(Debug)]
pub enum InventoryError {
    /// Missing or invalid input.
    Validation(ValidationError),
    /// Another domain already uses this slug.
    DomainAlreadyExists(String),
    /// Another class already uses this name.
    ClassAlreadyExists(String),
    DomainNotFound(DomainId),
    ClassNotFound(ClassId),
    /// Tag id is not part of the domain's tag list.
    TagNotFound(TagId),
    /// Element does not exist, or lives in another domain.
    ElementNotFound(ElementId),
    /// Optimistic concurrency check failed.
    Conflict {
        id: String,
        expected: i64,
        actual: i64,
    },
    /// Class is still referenced by elements.
    ClassInUse(ClassId),
    /// Persistence-layer failure.
    Storage(RepoError),
}

impl InventoryError {
    /// Stable numeric code exposed to API consumers.
    pub fn code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::DomainAlreadyExists(_) | Self::ClassAlreadyExists(_) => {
                CODE_VALIDATION
            }
            Self::DomainNotFound(_) => CODE_DOMAIN_NOT_FOUND,
            Self::ClassNotFound(_) => CODE_CLASS_NOT_FOUND,
            Self::TagNotFound(_) => CODE_TAG_NOT_FOUND,
            Self::ElementNotFound(_) => CODE_ELEMENT_NOT_FOUND,
            Self::Conflict { .. } => CODE_CONFLICT,
            Self::ClassInUse(_) => CODE_CLASS_IN_USE,
            Self::Storage(_) => CODE_STORAGE,
        }
    }

    /// Short machine-friendly label used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::DomainAlreadyExists(_) => "domain_already_exists",
            Self::ClassAlreadyExists(_) => "class_already_exists",
            Self::DomainNotFound(_) => "domain_not_found",
            Self::ClassNotFound(_) => "class_not_found",
            Self::TagNotFound(_) => "tag_not_found",
            Self::ElementNotFound(_) => "element_not_found",
            Self::Conflict { .. } => "conflict",
            Self::ClassInUse(_) => "class_in_use",
            Self::Storage(_) => "storage",
        }
    }
}

impl Display for InventoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DomainAlreadyExists(slug) => write!(f, "domain `{slug}` already exists"),
            Self::ClassAlreadyExists(name) => write!(f, "class `{name}` already exists"),
            Self::DomainNotFound(id) => write!(f, "domain not found: {id}"),
            Self::ClassNotFound(id) => write!(f, "class not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::ElementNotFound(id) => write!(f, "inventory element not found: {id}"),
            Self::Conflict {
                id,
                expected,
                actual,
            } => write!(
                f,
                "document {id} was modified concurrently: expected version {expected}, found {actual}"
            ),
            Self::ClassInUse(id) => write!(f, "class {id} is referenced by inventory elements"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InventoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for InventoryError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for InventoryError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Conflict {
                id,
                expected,
                actual,
                ..
            } => Self::Conflict {
                id,
                expected,
                actual,
            },
            RepoError::Duplicate {
                collection: DOMAINS,
                key,
            } => Self::DomainAlreadyExists(key),
            RepoError::Duplicate {
                collection: CLASSES,
                key,
            } => Self::ClassAlreadyExists(key),
            RepoError::Referenced {
                collection: CLASSES,
                id,
            } => Self::ClassInUse(id),
            RepoError::UnknownTag { tag_id, .. } => Self::TagNotFound(tag_id),
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InventoryError;
    use crate::model::ValidationError;
    use crate::repo::RepoError;

    #[test]
    fn codes_match_published_contract() {
        assert_eq!(
            InventoryError::Validation(ValidationError::MissingField("name")).code(),
            -1
        );
        assert_eq!(
            InventoryError::DomainAlreadyExists("new-domain".to_string()).code(),
            -1
        );
        assert_eq!(InventoryError::TagNotFound("t".to_string()).code(), -4);
        assert_eq!(InventoryError::ElementNotFound("e".to_string()).code(), -5);
    }

    #[test]
    fn repo_conflict_maps_to_conflict() {
        let err = InventoryError::from(RepoError::Conflict {
            collection: "inventory_domains",
            id: "d1".to_string(),
            expected: 1,
            actual: 2,
        });
        assert!(matches!(
            err,
            InventoryError::Conflict { expected: 1, actual: 2, .. }
        ));
        assert_eq!(err.code(), -6);
    }

    #[test]
    fn repo_unknown_tag_maps_to_tag_not_found() {
        let err = InventoryError::from(RepoError::UnknownTag {
            domain_id: "d1".to_string(),
            tag_id: "t1".to_string(),
        });
        assert!(matches!(err, InventoryError::TagNotFound(ref id) if id == "t1"));
        assert_eq!(err.code(), -4);
    }
}
