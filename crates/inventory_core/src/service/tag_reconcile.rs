//! Tag list reconciliation.
//!
//! # Responsibility
//! - Diff a domain's stored tags against the caller's desired list.
//!
//! # Invariants
//! - Pure: no storage access, inputs are never mutated.
//! - Result order follows the desired list.
//! - Slugs in the result are unique.

use crate::error::InventoryError;
use crate::model::domain::{Tag, TagId, TagInput};
use crate::model::ValidationError;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from tag reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagReconcileError {
    /// Desired entry carries an id that is not stored.
    UnknownTag(TagId),
    /// Desired entry has an unusable name or repeats a tag.
    Invalid(ValidationError),
}

impl Display for TagReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTag(id) => write!(f, "tag not found: {id}"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TagReconcileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::UnknownTag(_) => None,
        }
    }
}

impl From<ValidationError> for TagReconcileError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<TagReconcileError> for InventoryError {
    fn from(value: TagReconcileError) -> Self {
        match value {
            TagReconcileError::UnknownTag(id) => Self::TagNotFound(id),
            TagReconcileError::Invalid(err) => Self::Validation(err),
        }
    }
}

/// Outcome of diffing stored tags against a desired list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPlan {
    /// New tags with freshly generated ids.
    pub to_create: Vec<Tag>,
    /// Stored tags whose name changed, in their new form.
    pub to_update: Vec<Tag>,
    /// Stored tags absent from the desired list.
    pub to_delete: Vec<Tag>,
    tags: Vec<Tag>,
}

impl TagPlan {
    /// Resulting tag list, in desired order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Consumes the plan and returns the resulting tag list.
    pub fn apply(self) -> Vec<Tag> {
        self.tags
    }

    /// Ids of the tags the plan removes.
    pub fn deleted_ids(&self) -> Vec<TagId> {
        self.to_delete.iter().map(|tag| tag.id.clone()).collect()
    }

    /// Returns whether applying the plan changes nothing.
    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

/// Diffs `existing` against `desired` by tag id.
///
/// # Rules
/// - Entries without an id are created with a generated id.
/// - Entries whose id is stored are kept, and re-slugged into the new
///   name when it differs.
/// - Stored tags missing from `desired` are deleted.
/// - An id that is not stored fails with `UnknownTag`.
/// - Two entries with the same id or slug fail with `DuplicateTag`.
pub fn reconcile_tags(
    existing: &[Tag],
    desired: &[TagInput],
) -> Result<TagPlan, TagReconcileError> {
    let stored: HashMap<&str, &Tag> = existing.iter().map(|tag| (tag.id.as_str(), tag)).collect();
    let mut kept_ids = HashSet::new();
    let mut slugs = HashSet::new();
    let mut plan = TagPlan {
        to_create: Vec::new(),
        to_update: Vec::new(),
        to_delete: Vec::new(),
        tags: Vec::with_capacity(desired.len()),
    };

    for entry in desired {
        let tag = match entry.id.as_deref() {
            Some(id) => {
                let current = stored
                    .get(id)
                    .ok_or_else(|| TagReconcileError::UnknownTag(id.to_string()))?;
                if !kept_ids.insert(id) {
                    return Err(ValidationError::DuplicateTag(current.slug.clone()).into());
                }
                let mut tag = (*current).clone();
                tag.rename(&entry.name)?;
                if tag != **current {
                    plan.to_update.push(tag.clone());
                }
                tag
            }
            None => {
                let tag = Tag::new(&entry.name)?;
                plan.to_create.push(tag.clone());
                tag
            }
        };

        if !slugs.insert(tag.slug.clone()) {
            return Err(ValidationError::DuplicateTag(tag.slug).into());
        }
        plan.tags.push(tag);
    }

    plan.to_delete = existing
        .iter()
        .filter(|tag| !kept_ids.contains(tag.id.as_str()))
        .cloned()
        .collect();

    Ok(plan)
}
