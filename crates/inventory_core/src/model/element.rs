//! Inventory element model.
//!
//! # Responsibility
//! - Define the element document and its request/read-view shapes.
//!
//! # Invariants
//! - `domain_id` and `class_id` never change after creation.
//! - `parent_id`, when set, names an element of the same domain that existed
//!   before this one, so parent links form a forest.
//! - `tags` holds no duplicates.

use crate::model::audit::AuditInfo;
use crate::model::class::ClassId;
use crate::model::domain::{DomainId, InventoryDomain, Tag, TagId};
use crate::model::new_document_id;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stable identifier of an element document.
pub type ElementId = String;

/// One attribute name/value pair carried by an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub name: String,
    pub value: String,
}

impl AttributeValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Stored element document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryElement {
    pub id: ElementId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub domain_id: DomainId,
    pub class_id: ClassId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ElementId>,
    #[serde(default)]
    pub attributes: Vec<AttributeValue>,
    #[serde(default)]
    pub tags: Vec<TagId>,
    #[serde(flatten)]
    pub audit: AuditInfo,
    pub version: i64,
}

impl InventoryElement {
    /// Builds a new element document from already validated parts.
    pub fn new(
        domain_id: DomainId,
        class_id: ClassId,
        name: String,
        request: NewInventoryElement,
        actor: &str,
    ) -> Self {
        Self {
            id: new_document_id(),
            name,
            description: request.description,
            domain_id,
            class_id,
            parent_id: request.parent_id,
            attributes: request.attributes,
            tags: dedup_tag_ids(request.tags),
            audit: AuditInfo::created(actor),
            version: 0,
        }
    }

    /// Builds the read view, resolving tag ids against `domain`.
    pub fn view(&self, domain: &InventoryDomain) -> InventoryElementView {
        InventoryElementView {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            domain_id: self.domain_id.clone(),
            class_id: self.class_id.clone(),
            parent_id: self.parent_id.clone(),
            attributes: self.attributes.clone(),
            tags: domain.resolve_tags(&self.tags),
            audit: self.audit.clone(),
            version: self.version,
        }
    }

    /// Builds the list item, resolving tag ids against `domain`.
    pub fn summary(&self, domain: &InventoryDomain) -> InventoryElementSummary {
        InventoryElementSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            domain_id: self.domain_id.clone(),
            class_id: self.class_id.clone(),
            parent_id: self.parent_id.clone(),
            tags: domain.resolve_tags(&self.tags),
            audit: self.audit.clone(),
        }
    }
}

/// Removes repeated tag ids, keeping first occurrences in order.
pub fn dedup_tag_ids(ids: Vec<TagId>) -> Vec<TagId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Request payload for creating an element inside a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryElement {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub class_id: Option<ClassId>,
    #[serde(default)]
    pub parent_id: Option<ElementId>,
    #[serde(default)]
    pub attributes: Vec<AttributeValue>,
    #[serde(default)]
    pub tags: Vec<TagId>,
}

/// Partial update payload for an element. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryElement {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Option<Vec<AttributeValue>>,
    #[serde(default)]
    pub tags: Option<Vec<TagId>>,
    /// Expected stored version; `None` skips the explicit check.
    #[serde(default)]
    pub version: Option<i64>,
}

/// Fully resolved element returned by `get_full_element`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryElementView {
    pub id: ElementId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub domain_id: DomainId,
    pub class_id: ClassId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ElementId>,
    pub attributes: Vec<AttributeValue>,
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub audit: AuditInfo,
    pub version: i64,
}

/// Element list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryElementSummary {
    pub id: ElementId,
    pub name: String,
    pub domain_id: DomainId,
    pub class_id: ClassId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ElementId>,
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

/// Parent filter for element listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParentFilter {
    /// Every element of the domain.
    #[default]
    Any,
    /// Elements without a parent.
    Root,
    /// Direct children of one element.
    Children(ElementId),
}

/// Query options for listing elements of one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementListQuery {
    pub parent: ParentFilter,
    pub limit: Option<u32>,
    pub offset: u32,
}
