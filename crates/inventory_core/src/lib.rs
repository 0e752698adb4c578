//! Core logic of the inventory catalog.
//! This crate owns every catalog invariant; front ends only translate I/O.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod slug;

pub use config::CatalogConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use error::{InventoryError, InventoryResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::audit::AuditInfo;
pub use model::class::{
    AttributeType, ClassId, InventoryClass, InventoryClassAttribute, InventoryClassSummary,
    InventoryClassType, NewInventoryClass, UpdateInventoryClass,
};
pub use model::domain::{
    DomainId, InventoryDomain, InventoryDomainSummary, InventoryDomainView, NewInventoryDomain,
    Tag, TagId, TagInput, UpdateInventoryDomain,
};
pub use model::element::{
    AttributeValue, ElementId, ElementListQuery, InventoryElement, InventoryElementSummary,
    InventoryElementView, NewInventoryElement, ParentFilter, UpdateInventoryElement,
};
pub use model::ValidationError;
pub use repo::class_repo::{ClassRepository, SqliteClassRepository};
pub use repo::domain_repo::{DomainRepository, SqliteDomainRepository};
pub use repo::element_repo::{ElementRepository, SqliteElementRepository};
pub use repo::{RepoError, RepoResult};
pub use service::class_service::ClassService;
pub use service::domain_service::DomainService;
pub use service::element_service::ElementService;
pub use service::tag_reconcile::{reconcile_tags, TagPlan, TagReconcileError};
pub use slug::slugify;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
