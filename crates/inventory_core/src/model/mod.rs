//! Catalog document model.
//!
//! # Responsibility
//! - Define the documents stored per collection (classes, domains, elements).
//! - Define request payloads and read views exchanged with callers.
//! - Own schema-level validation that needs no storage access.
//!
//! # Invariants
//! - Every document is identified by an opaque string id generated on first save.
//! - Every document carries audit metadata and an optimistic `version` counter.

pub mod audit;
pub mod class;
pub mod domain;
pub mod element;

use crate::model::class::AttributeType;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected before any storage access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is absent or blank.
    MissingField(&'static str),
    /// Name produces an empty slug.
    InvalidName(String),
    /// Class schema declares the same attribute twice (compared by slug).
    DuplicateAttributeDefinition(String),
    /// Element supplies the same attribute twice (compared by slug).
    DuplicateAttributeValue(String),
    /// Element attribute is not declared by its class.
    UnknownAttribute(String),
    /// Mandatory class attribute is absent from the element.
    MissingMandatoryAttribute(String),
    /// Attribute value is blank or does not parse as the declared type.
    InvalidAttributeValue {
        name: String,
        expected: AttributeType,
    },
    /// Two tags in one domain share a slug.
    DuplicateTag(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "`{field}` is a mandatory field"),
            Self::InvalidName(name) => write!(f, "name `{name}` has no usable characters"),
            Self::DuplicateAttributeDefinition(name) => {
                write!(f, "attribute `{name}` is declared more than once")
            }
            Self::DuplicateAttributeValue(name) => {
                write!(f, "attribute `{name}` is supplied more than once")
            }
            Self::UnknownAttribute(name) => {
                write!(f, "attribute `{name}` is not declared by the class")
            }
            Self::MissingMandatoryAttribute(name) => {
                write!(f, "mandatory attribute `{name}` is missing")
            }
            Self::InvalidAttributeValue { name, expected } => {
                write!(f, "attribute `{name}` expects a {expected} value")
            }
            Self::DuplicateTag(slug) => write!(f, "tag `{slug}` is defined more than once"),
        }
    }
}

impl Error for ValidationError {}

/// Returns the trimmed value, or `MissingField` when it is blank.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Generates a new opaque document id.
pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
