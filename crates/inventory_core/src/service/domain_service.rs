//! Domain use-case service.
//!
//! # Responsibility
//! - Create and update domains, including their embedded tag lists.
//! - Serve full domain views and domain listings.
//!
//! # Invariants
//! - Domain slugs are unique across the catalog.
//! - Tags removed from a domain are removed from its elements in the same
//!   write.

use crate::error::{InventoryError, InventoryResult};
use crate::model::domain::{
    DomainId, InventoryDomain, InventoryDomainSummary, InventoryDomainView, NewInventoryDomain,
    UpdateInventoryDomain,
};
use crate::repo::domain_repo::DomainRepository;
use crate::service::tag_reconcile::reconcile_tags;
use crate::service::{check_version, log_rejection};
use log::info;
use std::time::Instant;

/// Domain facade over a domain repository.
pub struct DomainService<R: DomainRepository> {
    repo: R,
}

impl<R: DomainRepository> DomainService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a domain and its initial tags, returning the domain id.
    ///
    /// # Errors
    /// - `Validation` when the name has no usable characters or two tags
    ///   share a slug.
    /// - `DomainAlreadyExists` when another domain has the same slug.
    /// - `TagNotFound` when an initial tag entry carries an id.
    pub fn create_domain(
        &self,
        actor: &str,
        request: NewInventoryDomain,
    ) -> InventoryResult<DomainId> {
        self.create_domain_inner(actor, request)
            .inspect_err(|err| log_rejection("domain_create", err))
    }

    fn create_domain_inner(
        &self,
        actor: &str,
        request: NewInventoryDomain,
    ) -> InventoryResult<DomainId> {
        let mut domain = InventoryDomain::new(&request.name, request.description, actor)?;
        if self.repo.find_domain_by_slug(&domain.slug)?.is_some() {
            return Err(InventoryError::DomainAlreadyExists(domain.slug));
        }
        domain.tags = reconcile_tags(&[], &request.tags)?.apply();

        self.repo.insert_domain(&domain)?;
        info!(
            "event=domain_create module=service status=ok domain_id={} tags={}",
            domain.id,
            domain.tags.len()
        );
        Ok(domain.id)
    }

    /// Applies a partial update and returns the stored domain.
    ///
    /// When `request.tags` is present it replaces the tag list through
    /// [`reconcile_tags`].
    pub fn update_domain(
        &self,
        actor: &str,
        domain_id: &str,
        request: UpdateInventoryDomain,
    ) -> InventoryResult<InventoryDomainView> {
        self.update_domain_inner(actor, domain_id, request)
            .inspect_err(|err| log_rejection("domain_update", err))
    }

    fn update_domain_inner(
        &self,
        actor: &str,
        domain_id: &str,
        request: UpdateInventoryDomain,
    ) -> InventoryResult<InventoryDomainView> {
        let started_at = Instant::now();
        let mut domain = self.get_full_domain(domain_id)?;
        check_version(&domain.id, request.version, domain.version)?;

        if let Some(name) = request.name {
            domain.rename(&name)?;
            if let Some(other) = self.repo.find_domain_by_slug(&domain.slug)? {
                if other.id != domain.id {
                    return Err(InventoryError::DomainAlreadyExists(domain.slug));
                }
            }
        }
        if let Some(description) = request.description {
            domain.description = Some(description);
        }

        let mut detached = Vec::new();
        if let Some(tags) = request.tags {
            let plan = reconcile_tags(&domain.tags, &tags)?;
            detached = plan.deleted_ids();
            domain.tags = plan.apply();
        }
        domain.audit.touch(actor);

        let rewritten = self.repo.update_domain(&mut domain, &detached)?;
        info!(
            "event=domain_update module=service status=ok domain_id={} version={} tags_removed={} elements_rewritten={} duration_ms={}",
            domain.id,
            domain.version,
            detached.len(),
            rewritten,
            started_at.elapsed().as_millis()
        );
        Ok(domain)
    }

    /// Loads one domain with its tag objects.
    pub fn get_full_domain(&self, domain_id: &str) -> InventoryResult<InventoryDomainView> {
        self.repo
            .get_domain(domain_id)?
            .ok_or_else(|| InventoryError::DomainNotFound(domain_id.to_string()))
    }

    /// Lists domain summaries ordered by slug.
    pub fn list_domains(&self) -> InventoryResult<Vec<InventoryDomainSummary>> {
        let domains = self.repo.list_domains()?;
        Ok(domains.iter().map(InventoryDomain::summary).collect())
    }
}
