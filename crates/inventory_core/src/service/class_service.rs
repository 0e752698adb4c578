//! Class registry use-case service.
//!
//! # Responsibility
//! - Create, read, update and delete class definitions.
//! - Enforce unique class names and well-formed attribute schemas.
//!
//! # Invariants
//! - Schema changes are not validated retroactively against elements.
//! - A class referenced by elements cannot be deleted.

use crate::error::{InventoryError, InventoryResult};
use crate::model::class::{
    validate_attribute_schema, ClassId, InventoryClass, InventoryClassSummary, NewInventoryClass,
    UpdateInventoryClass,
};
use crate::repo::class_repo::ClassRepository;
use crate::service::{check_version, log_rejection};
use log::info;

/// Class registry facade over a class repository.
pub struct ClassService<R: ClassRepository> {
    repo: R,
}

impl<R: ClassRepository> ClassService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new class and returns its generated id.
    ///
    /// # Errors
    /// - `Validation` for a blank name or malformed attribute schema.
    /// - `ClassAlreadyExists` when the trimmed name is taken.
    pub fn create_class(
        &self,
        actor: &str,
        request: NewInventoryClass,
    ) -> InventoryResult<ClassId> {
        self.create_class_inner(actor, request)
            .inspect_err(|err| log_rejection("class_create", err))
    }

    fn create_class_inner(
        &self,
        actor: &str,
        request: NewInventoryClass,
    ) -> InventoryResult<ClassId> {
        let class = InventoryClass::from_request(request, actor)?;
        if self.repo.find_class_by_name(&class.name)?.is_some() {
            return Err(InventoryError::ClassAlreadyExists(class.name));
        }

        self.repo.insert_class(&class)?;
        info!(
            "event=class_create module=service status=ok class_id={} attributes={}",
            class.id,
            class.attributes.len()
        );
        Ok(class.id)
    }

    /// Loads one class by id.
    pub fn find_class(&self, id: &str) -> InventoryResult<InventoryClass> {
        self.repo
            .get_class(id)?
            .ok_or_else(|| InventoryError::ClassNotFound(id.to_string()))
    }

    /// Lists class summaries ordered by name.
    pub fn list_classes(&self) -> InventoryResult<Vec<InventoryClassSummary>> {
        let classes = self.repo.list_classes()?;
        Ok(classes.iter().map(InventoryClass::summary).collect())
    }

    /// Applies a partial update to description and attribute schema.
    ///
    /// Returns the stored class after the write.
    pub fn update_class(
        &self,
        actor: &str,
        id: &str,
        request: UpdateInventoryClass,
    ) -> InventoryResult<InventoryClass> {
        self.update_class_inner(actor, id, request)
            .inspect_err(|err| log_rejection("class_update", err))
    }

    fn update_class_inner(
        &self,
        actor: &str,
        id: &str,
        request: UpdateInventoryClass,
    ) -> InventoryResult<InventoryClass> {
        let mut class = self.find_class(id)?;
        check_version(&class.id, request.version, class.version)?;

        if let Some(attributes) = request.attributes {
            validate_attribute_schema(&attributes)?;
            class.attributes = attributes;
        }
        if let Some(description) = request.description {
            class.description = Some(description);
        }
        class.audit.touch(actor);

        self.repo.update_class(&mut class)?;
        info!(
            "event=class_update module=service status=ok class_id={} version={}",
            class.id, class.version
        );
        Ok(class)
    }

    /// Deletes one class that no element references.
    pub fn delete_class(&self, id: &str) -> InventoryResult<()> {
        self.delete_class_inner(id)
            .inspect_err(|err| log_rejection("class_delete", err))
    }

    fn delete_class_inner(&self, id: &str) -> InventoryResult<()> {
        let class = self.find_class(id)?;
        if self.repo.is_class_referenced(&class.id)? {
            return Err(InventoryError::ClassInUse(class.id));
        }
        self.repo.delete_class(&class.id)?;
        info!(
            "event=class_delete module=service status=ok class_id={}",
            class.id
        );
        Ok(())
    }
}
