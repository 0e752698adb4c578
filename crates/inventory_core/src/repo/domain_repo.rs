//! Domain repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist domain documents (with embedded tags) in `inventory_domains`.
//! - Pull detached tag ids out of element documents in the same transaction
//!   as the domain write.
//!
//! # Invariants
//! - Domain slugs are unique (enforced by a `UNIQUE` column).
//! - After `update_domain` commits, no element of the domain references a
//!   detached tag.

use crate::model::domain::{InventoryDomain, TagId};
use crate::model::element::InventoryElement;
use crate::repo::document::{
    decode, encode, ensure_collections_ready, query_document, query_documents, stale_write_error,
    DOMAINS, ELEMENTS,
};
use crate::repo::{map_constraint, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::collections::HashSet;

/// Repository interface for domain documents.
pub trait DomainRepository {
    /// Inserts a new domain document.
    fn insert_domain(&self, domain: &InventoryDomain) -> RepoResult<()>;
    /// Loads one domain by id.
    fn get_domain(&self, id: &str) -> RepoResult<Option<InventoryDomain>>;
    /// Loads one domain by slug.
    fn find_domain_by_slug(&self, slug: &str) -> RepoResult<Option<InventoryDomain>>;
    /// Lists every domain ordered by slug.
    fn list_domains(&self) -> RepoResult<Vec<InventoryDomain>>;
    /// Writes `domain` if the stored version still equals `domain.version`,
    /// then bumps `domain.version`.
    ///
    /// `detached_tags` are removed from every element of the domain within
    /// the same transaction. Returns how many elements were rewritten.
    fn update_domain(
        &self,
        domain: &mut InventoryDomain,
        detached_tags: &[TagId],
    ) -> RepoResult<usize>;
}

/// SQLite-backed domain repository.
pub struct SqliteDomainRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDomainRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_collections_ready(conn, &[DOMAINS, ELEMENTS])?;
        Ok(Self { conn })
    }
}

impl DomainRepository for SqliteDomainRepository<'_> {
    fn insert_domain(&self, domain: &InventoryDomain) -> RepoResult<()> {
        let document = encode(DOMAINS, domain)?;
        self.conn
            .execute(
                "INSERT INTO inventory_domains (id, slug, version, document)
                 VALUES (?1, ?2, ?3, ?4);",
                params![domain.id, domain.slug, domain.version, document],
            )
            .map_err(|err| map_constraint(err, DOMAINS, &domain.slug))?;
        Ok(())
    }

    fn get_domain(&self, id: &str) -> RepoResult<Option<InventoryDomain>> {
        query_document(
            self.conn,
            DOMAINS,
            "SELECT document FROM inventory_domains WHERE id = ?1;",
            [id],
        )
    }

    fn find_domain_by_slug(&self, slug: &str) -> RepoResult<Option<InventoryDomain>> {
        query_document(
            self.conn,
            DOMAINS,
            "SELECT document FROM inventory_domains WHERE slug = ?1;",
            [slug],
        )
    }

    fn list_domains(&self) -> RepoResult<Vec<InventoryDomain>> {
        query_documents(
            self.conn,
            DOMAINS,
            "SELECT document FROM inventory_domains ORDER BY slug ASC;",
            [],
        )
    }

    fn update_domain(
        &self,
        domain: &mut InventoryDomain,
        detached_tags: &[TagId],
    ) -> RepoResult<usize> {
        let expected = domain.version;
        domain.version = expected + 1;
        let result = write_domain(self.conn, domain, expected, detached_tags);
        if result.is_err() {
            domain.version = expected;
        }
        result
    }
}

fn write_domain(
    conn: &Connection,
    domain: &InventoryDomain,
    expected: i64,
    detached_tags: &[TagId],
) -> RepoResult<usize> {
    let document = encode(DOMAINS, domain)?;
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let changed = tx
        .execute(
            "UPDATE inventory_domains
             SET slug = ?2, version = ?3, document = ?4
             WHERE id = ?1 AND version = ?5;",
            params![domain.id, domain.slug, domain.version, document, expected],
        )
        .map_err(|err| map_constraint(err, DOMAINS, &domain.slug))?;
    if changed == 0 {
        return Err(stale_write_error(&tx, DOMAINS, &domain.id, expected));
    }

    let rewritten = if detached_tags.is_empty() {
        0
    } else {
        detach_tags_from_elements(&tx, domain, detached_tags)?
    };

    tx.commit()?;
    Ok(rewritten)
}

fn detach_tags_from_elements(
    conn: &Connection,
    domain: &InventoryDomain,
    detached_tags: &[TagId],
) -> RepoResult<usize> {
    let detached: HashSet<&str> = detached_tags.iter().map(String::as_str).collect();
    let mut stmt = conn.prepare(
        "SELECT document FROM inventory_elements WHERE domain_id = ?1 ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([domain.id.as_str()])?;
    let mut affected: Vec<InventoryElement> = Vec::new();
    while let Some(row) = rows.next()? {
        let text: String = row.get("document")?;
        let element: InventoryElement = decode(ELEMENTS, &text)?;
        if element.tags.iter().any(|id| detached.contains(id.as_str())) {
            affected.push(element);
        }
    }
    drop(rows);
    drop(stmt);

    for mut element in affected.iter().cloned() {
        let expected = element.version;
        element.tags.retain(|id| !detached.contains(id.as_str()));
        element.version = expected + 1;
        element.audit.last_modified_by = domain.audit.last_modified_by.clone();
        element.audit.last_modified_date = domain.audit.last_modified_date;

        let document = encode(ELEMENTS, &element)?;
        let changed = conn.execute(
            "UPDATE inventory_elements
             SET version = ?2, document = ?3
             WHERE id = ?1 AND version = ?4;",
            params![element.id, element.version, document, expected],
        )?;
        if changed == 0 {
            return Err(stale_write_error(conn, ELEMENTS, &element.id, expected));
        }
    }

    debug!(
        "event=tags_detached module=repo domain_id={} tags={} elements={}",
        domain.id,
        detached_tags.len(),
        affected.len()
    );
    Ok(affected.len())
}
