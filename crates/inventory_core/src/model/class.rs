//! Inventory class model.
//!
//! # Responsibility
//! - Define the reusable schema an element instantiates.
//! - Validate attribute definitions and element attribute values.
//!
//! # Invariants
//! - Attribute names in one class are non-empty and unique by slug.
//! - Element attributes are matched against the schema by slug, so
//!   `"Building Number"` and `"building-number"` name the same attribute.

use crate::model::audit::AuditInfo;
use crate::model::element::AttributeValue;
use crate::model::{new_document_id, require_text, ValidationError};
use crate::slug::{slugify, try_slugify};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};

/// Stable identifier of a class document.
pub type ClassId = String;

/// Kind of physical item a class describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryClassType {
    Building,
    Floor,
    Room,
    Item,
    Cable,
}

/// Primitive type an attribute value must parse as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    String,
    Number,
    Boolean,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// RFC 3339 timestamp.
    DateTime,
}

impl AttributeType {
    /// Returns whether `value` is a valid textual encoding of this type.
    pub fn accepts(self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        match self {
            Self::String => true,
            Self::Number => value.parse::<f64>().is_ok_and(f64::is_finite),
            Self::Boolean => {
                value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
            }
            Self::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            Self::DateTime => DateTime::parse_from_rfc3339(value).is_ok(),
        }
    }
}

impl Display for AttributeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "date-time",
        };
        f.write_str(label)
    }
}

/// One attribute declared by a class schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryClassAttribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl InventoryClassAttribute {
    /// Convenience constructor for an attribute with no description or unit.
    pub fn new(name: impl Into<String>, kind: AttributeType, mandatory: bool) -> Self {
        Self {
            name: name.into(),
            description: None,
            mandatory,
            kind,
            unit: None,
        }
    }

    /// Slug used to match element attribute values against this definition.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// Stored class document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryClass {
    pub id: ClassId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: InventoryClassType,
    #[serde(default)]
    pub attributes: Vec<InventoryClassAttribute>,
    #[serde(flatten)]
    pub audit: AuditInfo,
    pub version: i64,
}

impl InventoryClass {
    /// Builds a new class document from a validated request.
    pub fn from_request(request: NewInventoryClass, actor: &str) -> Result<Self, ValidationError> {
        let name = require_text("name", &request.name)?;
        validate_attribute_schema(&request.attributes)?;
        Ok(Self {
            id: new_document_id(),
            name,
            description: request.description,
            kind: request.kind,
            attributes: request.attributes,
            audit: AuditInfo::created(actor),
            version: 0,
        })
    }

    /// Checks element attribute values against this class schema.
    ///
    /// # Rules
    /// - Every value names a declared attribute (matched by slug).
    /// - No attribute is supplied twice.
    /// - Every value parses as the declared primitive type.
    /// - Every mandatory attribute is present.
    pub fn validate_values(&self, values: &[AttributeValue]) -> Result<(), ValidationError> {
        let schema: HashMap<String, &InventoryClassAttribute> = self
            .attributes
            .iter()
            .map(|attribute| (attribute.slug(), attribute))
            .collect();

        let mut supplied = HashSet::new();
        for value in values {
            let slug = slugify(&value.name);
            let definition = schema
                .get(&slug)
                .ok_or_else(|| ValidationError::UnknownAttribute(value.name.clone()))?;
            if !supplied.insert(slug) {
                return Err(ValidationError::DuplicateAttributeValue(value.name.clone()));
            }
            if !definition.kind.accepts(&value.value) {
                return Err(ValidationError::InvalidAttributeValue {
                    name: value.name.clone(),
                    expected: definition.kind,
                });
            }
        }

        if let Some(missing) = self
            .attributes
            .iter()
            .find(|attribute| attribute.mandatory && !supplied.contains(&attribute.slug()))
        {
            return Err(ValidationError::MissingMandatoryAttribute(
                missing.name.clone(),
            ));
        }

        Ok(())
    }

    /// Returns the list-view projection of this class.
    pub fn summary(&self) -> InventoryClassSummary {
        InventoryClassSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
        }
    }
}

/// Checks that attribute names are non-empty and unique by slug.
pub fn validate_attribute_schema(
    attributes: &[InventoryClassAttribute],
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for attribute in attributes {
        let slug = try_slugify(&attribute.name)
            .ok_or_else(|| ValidationError::InvalidName(attribute.name.clone()))?;
        if !seen.insert(slug) {
            return Err(ValidationError::DuplicateAttributeDefinition(
                attribute.name.clone(),
            ));
        }
    }
    Ok(())
}

/// Request payload for creating a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryClass {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: InventoryClassType,
    #[serde(default)]
    pub attributes: Vec<InventoryClassAttribute>,
}

/// Partial update payload for a class. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryClass {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Option<Vec<InventoryClassAttribute>>,
    /// Expected stored version; `None` skips the explicit check.
    #[serde(default)]
    pub version: Option<i64>,
}

/// Class list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryClassSummary {
    pub id: ClassId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InventoryClassType,
}
