//! Inventory domain and tag model.
//!
//! # Responsibility
//! - Define the top-level container document and its embedded tags.
//! - Resolve element tag ids into tag objects for read views.
//!
//! # Invariants
//! - Domain `slug` is always `slugify(name)` and non-empty.
//! - Tag `name` and `slug` both hold the slugified input.
//! - Tag slugs are unique within one domain.

use crate::model::audit::AuditInfo;
use crate::model::{new_document_id, require_text, ValidationError};
use crate::slug::try_slugify;
use serde::{Deserialize, Serialize};

/// Stable identifier of a domain document.
pub type DomainId = String;
/// Stable identifier of a tag, unique within its domain.
pub type TagId = String;

/// Named label scoped to one domain. Its name is stored in slug form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
}

impl Tag {
    /// Creates a tag with a generated id and a slugified name.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let (_, slug) = name_and_slug(name)?;
        Ok(Self {
            id: new_document_id(),
            name: slug.clone(),
            slug,
        })
    }

    /// Renames the tag; the new name is re-slugged.
    pub fn rename(&mut self, name: &str) -> Result<(), ValidationError> {
        let (_, slug) = name_and_slug(name)?;
        self.name = slug.clone();
        self.slug = slug;
        Ok(())
    }
}

/// Tag entry in domain requests. Entries without `id` are new tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TagId>,
    #[serde(default)]
    pub name: String,
}

impl TagInput {
    /// Entry for a tag that does not exist yet.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Entry that keeps or renames the stored tag `id`.
    pub fn existing(id: impl Into<TagId>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }
}

impl From<&Tag> for TagInput {
    fn from(tag: &Tag) -> Self {
        Self::existing(tag.id.clone(), tag.name.clone())
    }
}

/// Stored domain document with its embedded tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDomain {
    pub id: DomainId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub audit: AuditInfo,
    pub version: i64,
}

impl InventoryDomain {
    /// Builds a new domain document with an empty tag list.
    ///
    /// Tags are attached by the service after reconciliation.
    pub fn new(
        name: &str,
        description: Option<String>,
        actor: &str,
    ) -> Result<Self, ValidationError> {
        let (name, slug) = name_and_slug(name)?;
        Ok(Self {
            id: new_document_id(),
            name,
            slug,
            description,
            tags: Vec::new(),
            audit: AuditInfo::created(actor),
            version: 0,
        })
    }

    /// Replaces the name and re-derives the slug.
    pub fn rename(&mut self, name: &str) -> Result<(), ValidationError> {
        let (name, slug) = name_and_slug(name)?;
        self.name = name;
        self.slug = slug;
        Ok(())
    }

    /// Looks up one tag by id.
    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    /// Returns the first id in `ids` that is not a tag of this domain.
    pub fn first_unknown_tag<'a>(&self, ids: &'a [TagId]) -> Option<&'a TagId> {
        ids.iter().find(|id| self.tag(id).is_none())
    }

    /// Resolves tag ids into tag objects, keeping the order of `ids`.
    ///
    /// Unknown ids are skipped.
    pub fn resolve_tags(&self, ids: &[TagId]) -> Vec<Tag> {
        ids.iter().filter_map(|id| self.tag(id).cloned()).collect()
    }

    /// Returns the list-view projection of this domain.
    pub fn summary(&self) -> InventoryDomainSummary {
        InventoryDomainSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Full read view of a domain. Tags are embedded, so the stored document
/// already carries every resolved tag object.
pub type InventoryDomainView = InventoryDomain;

/// Request payload for creating a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryDomain {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagInput>,
}

/// Partial update payload for a domain.
///
/// `tags`, when present, is the complete desired tag list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryDomain {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<TagInput>>,
    /// Expected stored version; `None` skips the explicit check.
    #[serde(default)]
    pub version: Option<i64>,
}

/// Domain list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDomainSummary {
    pub id: DomainId,
    pub name: String,
    pub slug: String,
}

fn name_and_slug(name: &str) -> Result<(String, String), ValidationError> {
    let name = require_text("name", name)?;
    let slug = try_slugify(&name).ok_or_else(|| ValidationError::InvalidName(name.clone()))?;
    Ok((name, slug))
}

#[cfg(test)]
mod tests {
    use super::{InventoryDomain, Tag};
    use crate::model::ValidationError;

    #[test]
    fn domain_derives_slug_from_name() {
        let domain = InventoryDomain::new("  New Domain ", None, "tester").unwrap();
        assert_eq!(domain.name, "New Domain");
        assert_eq!(domain.slug, "new-domain");
        assert!(domain.tags.is_empty());
    }

    #[test]
    fn blank_or_symbol_only_names_are_rejected() {
        assert_eq!(
            InventoryDomain::new("   ", None, "tester").unwrap_err(),
            ValidationError::MissingField("name")
        );
        assert!(matches!(
            Tag::new("###"),
            Err(ValidationError::InvalidName(_))
        ));
    }

    #[test]
    fn tag_names_are_stored_slugified() {
        let mut tag = Tag::new("tag a").unwrap();
        assert_eq!(tag.name, "tag-a");
        assert_eq!(tag.slug, "tag-a");

        tag.rename("Updated tag name").unwrap();
        assert_eq!(tag.name, "updated-tag-name");
        assert_eq!(tag.slug, "updated-tag-name");
    }

    #[test]
    fn resolve_tags_keeps_request_order_and_skips_unknown() {
        let mut domain = InventoryDomain::new("domain-a", None, "tester").unwrap();
        let first = Tag::new("tag-a").unwrap();
        let second = Tag::new("tag-b").unwrap();
        domain.tags = vec![first.clone(), second.clone()];

        let ids = vec![second.id.clone(), "missing".to_string(), first.id.clone()];
        let resolved = domain.resolve_tags(&ids);
        assert_eq!(resolved, vec![second, first]);
        assert_eq!(domain.first_unknown_tag(&ids).map(String::as_str), Some("missing"));
    }
}
