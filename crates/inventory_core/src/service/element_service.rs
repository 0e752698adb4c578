//! Element use-case service.
//!
//! # Responsibility
//! - Create and update elements inside a domain.
//! - Serve resolved element views and parent-filtered listings.
//!
//! # Invariants
//! - Every check runs before the first write.
//! - Create checks run in a fixed order: field presence, domain, class,
//!   parent, tags, attribute values.
//! - An element is only visible through the domain that owns it.
//! - Tag ids are checked again by the repository inside the write
//!   transaction; a tag removed since the domain was loaded is `TagNotFound`.

use crate::error::{InventoryError, InventoryResult};
use crate::model::class::InventoryClass;
use crate::model::domain::{InventoryDomain, TagId};
use crate::model::element::{
    dedup_tag_ids, ElementId, ElementListQuery, InventoryElement, InventoryElementSummary,
    InventoryElementView, NewInventoryElement, UpdateInventoryElement,
};
use crate::model::require_text;
use crate::repo::class_repo::ClassRepository;
use crate::repo::domain_repo::DomainRepository;
use crate::repo::element_repo::ElementRepository;
use crate::service::{check_version, log_rejection};
use log::info;

/// Element facade over class, domain and element repositories.
pub struct ElementService<C, D, E>
where
    C: ClassRepository,
    D: DomainRepository,
    E: ElementRepository,
{
    classes: C,
    domains: D,
    elements: E,
}

impl<C, D, E> ElementService<C, D, E>
where
    C: ClassRepository,
    D: DomainRepository,
    E: ElementRepository,
{
    /// Creates a service using the provided repository implementations.
    pub fn new(classes: C, domains: D, elements: E) -> Self {
        Self {
            classes,
            domains,
            elements,
        }
    }

    /// Creates an element inside `domain_id` and returns its id.
    ///
    /// # Errors
    /// - `Validation` when `domain_id`, `name` or `classId` is blank, or
    ///   when attribute values do not satisfy the class schema.
    /// - `DomainNotFound`, `ClassNotFound` for unknown references.
    /// - `ElementNotFound` when `parentId` is not an element of the domain.
    /// - `TagNotFound` when a tag id is not part of the domain.
    pub fn create_element(
        &self,
        actor: &str,
        domain_id: &str,
        request: NewInventoryElement,
    ) -> InventoryResult<ElementId> {
        self.create_element_inner(actor, domain_id, request)
            .inspect_err(|err| log_rejection("element_create", err))
    }

    fn create_element_inner(
        &self,
        actor: &str,
        domain_id: &str,
        request: NewInventoryElement,
    ) -> InventoryResult<ElementId> {
        let domain_id = require_text("domainId", domain_id)?;
        let name = require_text("name", &request.name)?;
        let class_id = require_text("classId", request.class_id.as_deref().unwrap_or_default())?;

        let domain = self.load_domain(&domain_id)?;
        let class = self.load_class(&class_id)?;
        if let Some(parent_id) = request.parent_id.as_deref() {
            self.load_element(&domain, parent_id)?;
        }
        ensure_tags_known(&domain, &request.tags)?;
        class.validate_values(&request.attributes)?;

        let element = InventoryElement::new(domain.id, class.id, name, request, actor);
        self.elements.insert_element(&element)?;
        info!(
            "event=element_create module=service status=ok element_id={} domain_id={} class_id={} has_parent={}",
            element.id,
            element.domain_id,
            element.class_id,
            element.parent_id.is_some()
        );
        Ok(element.id)
    }

    /// Applies a partial update and returns the resolved element view.
    ///
    /// Only fields present in `request` are replaced and validated.
    pub fn update_element(
        &self,
        actor: &str,
        domain_id: &str,
        element_id: &str,
        request: UpdateInventoryElement,
    ) -> InventoryResult<InventoryElementView> {
        self.update_element_inner(actor, domain_id, element_id, request)
            .inspect_err(|err| log_rejection("element_update", err))
    }

    fn update_element_inner(
        &self,
        actor: &str,
        domain_id: &str,
        element_id: &str,
        request: UpdateInventoryElement,
    ) -> InventoryResult<InventoryElementView> {
        let domain = self.load_domain(domain_id)?;
        let mut element = self.load_element(&domain, element_id)?;
        check_version(&element.id, request.version, element.version)?;

        if let Some(name) = request.name {
            element.name = require_text("name", &name)?;
        }
        if let Some(description) = request.description {
            element.description = Some(description);
        }
        if let Some(tags) = request.tags {
            ensure_tags_known(&domain, &tags)?;
            element.tags = dedup_tag_ids(tags);
        }
        if let Some(attributes) = request.attributes {
            let class = self.load_class(&element.class_id)?;
            class.validate_values(&attributes)?;
            element.attributes = attributes;
        }
        element.audit.touch(actor);

        self.elements.update_element(&mut element)?;
        info!(
            "event=element_update module=service status=ok element_id={} domain_id={} version={}",
            element.id, domain.id, element.version
        );
        Ok(element.view(&domain))
    }

    /// Loads one element of `domain_id` with its tag objects.
    pub fn get_full_element(
        &self,
        domain_id: &str,
        element_id: &str,
    ) -> InventoryResult<InventoryElementView> {
        let domain = self.load_domain(domain_id)?;
        let element = self.load_element(&domain, element_id)?;
        Ok(element.view(&domain))
    }

    /// Lists element summaries of one domain ordered by name, then id.
    pub fn list_elements(
        &self,
        domain_id: &str,
        query: &ElementListQuery,
    ) -> InventoryResult<Vec<InventoryElementSummary>> {
        let domain = self.load_domain(domain_id)?;
        let elements = self.elements.list_elements(&domain.id, query)?;
        Ok(elements
            .iter()
            .map(|element| element.summary(&domain))
            .collect())
    }

    fn load_domain(&self, domain_id: &str) -> InventoryResult<InventoryDomain> {
        self.domains
            .get_domain(domain_id)?
            .ok_or_else(|| InventoryError::DomainNotFound(domain_id.to_string()))
    }

    fn load_class(&self, class_id: &str) -> InventoryResult<InventoryClass> {
        self.classes
            .get_class(class_id)?
            .ok_or_else(|| InventoryError::ClassNotFound(class_id.to_string()))
    }

    /// Elements of other domains are reported as missing.
    fn load_element(
        &self,
        domain: &InventoryDomain,
        element_id: &str,
    ) -> InventoryResult<InventoryElement> {
        self.elements
            .get_element(element_id)?
            .filter(|element| element.domain_id == domain.id)
            .ok_or_else(|| InventoryError::ElementNotFound(element_id.to_string()))
    }
}

fn ensure_tags_known(domain: &InventoryDomain, tags: &[TagId]) -> InventoryResult<()> {
    match domain.first_unknown_tag(tags) {
        Some(id) => Err(InventoryError::TagNotFound(id.clone())),
        None => Ok(()),
    }
}
