//! Element repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist element documents in `inventory_elements`.
//! - Serve parent-filtered listings for element trees.
//!
//! # Invariants
//! - `domain_id`, `class_id` and `parent_id` key columns mirror the document.
//! - Listing order is deterministic: `name ASC, id ASC`.
//! - Tag ids are re-checked against the stored domain inside the write
//!   transaction, so a concurrent tag removal cannot leave a dangling id.

use crate::model::domain::InventoryDomain;
use crate::model::element::{ElementListQuery, InventoryElement, ParentFilter};
use crate::repo::document::{
    encode, ensure_collections_ready, query_document, query_documents, stale_write_error,
    DOMAINS, ELEMENTS,
};
use crate::repo::{map_constraint, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Transaction, TransactionBehavior};

/// Repository interface for element documents.
pub trait ElementRepository {
    /// Inserts a new element document.
    ///
    /// Fails with `UnknownTag` when a tag id is no longer in the stored domain.
    fn insert_element(&self, element: &InventoryElement) -> RepoResult<()>;
    /// Loads one element by id, regardless of domain.
    fn get_element(&self, id: &str) -> RepoResult<Option<InventoryElement>>;
    /// Writes `element` if the stored version still equals
    /// `element.version`, then bumps `element.version`.
    fn update_element(&self, element: &mut InventoryElement) -> RepoResult<()>;
    /// Lists elements of one domain.
    fn list_elements(
        &self,
        domain_id: &str,
        query: &ElementListQuery,
    ) -> RepoResult<Vec<InventoryElement>>;
}

/// SQLite-backed element repository.
pub struct SqliteElementRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteElementRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_collections_ready(conn, &[DOMAINS, ELEMENTS])?;
        Ok(Self { conn })
    }
}

impl ElementRepository for SqliteElementRepository<'_> {
    fn insert_element(&self, element: &InventoryElement) -> RepoResult<()> {
        let document = encode(ELEMENTS, element)?;
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_tags_attached(&tx, element)?;
        tx.execute(
            "INSERT INTO inventory_elements (
                id,
                domain_id,
                class_id,
                parent_id,
                name,
                version,
                document
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                element.id,
                element.domain_id,
                element.class_id,
                element.parent_id,
                element.name,
                element.version,
                document,
            ],
        )
        .map_err(|err| map_constraint(err, ELEMENTS, &element.id))?;
        tx.commit()?;
        Ok(())
    }

    fn get_element(&self, id: &str) -> RepoResult<Option<InventoryElement>> {
        query_document(
            self.conn,
            ELEMENTS,
            "SELECT document FROM inventory_elements WHERE id = ?1;",
            [id],
        )
    }

    fn update_element(&self, element: &mut InventoryElement) -> RepoResult<()> {
        let expected = element.version;
        element.version = expected + 1;
        let result = write_element(self.conn, element, expected);
        if result.is_err() {
            element.version = expected;
        }
        result
    }

    fn list_elements(
        &self,
        domain_id: &str,
        query: &ElementListQuery,
    ) -> RepoResult<Vec<InventoryElement>> {
        let mut sql = String::from("SELECT document FROM inventory_elements WHERE domain_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(domain_id.to_string())];

        match &query.parent {
            ParentFilter::Any => {}
            ParentFilter::Root => sql.push_str(" AND parent_id IS NULL"),
            ParentFilter::Children(parent_id) => {
                sql.push_str(" AND parent_id = ?");
                bind_values.push(Value::Text(parent_id.clone()));
            }
        }

        sql.push_str(" ORDER BY name ASC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        query_documents(self.conn, ELEMENTS, &sql, params_from_iter(bind_values))
    }
}

fn write_element(conn: &Connection, element: &InventoryElement, expected: i64) -> RepoResult<()> {
    let document = encode(ELEMENTS, element)?;
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    ensure_tags_attached(&tx, element)?;

    let changed = tx
        .execute(
            "UPDATE inventory_elements
             SET name = ?2, version = ?3, document = ?4
             WHERE id = ?1 AND version = ?5;",
            params![element.id, element.name, element.version, document, expected],
        )
        .map_err(|err| map_constraint(err, ELEMENTS, &element.id))?;
    if changed == 0 {
        return Err(stale_write_error(&tx, ELEMENTS, &element.id, expected));
    }

    tx.commit()?;
    Ok(())
}

fn ensure_tags_attached(conn: &Connection, element: &InventoryElement) -> RepoResult<()> {
    if element.tags.is_empty() {
        return Ok(());
    }

    let domain: InventoryDomain = query_document(
        conn,
        DOMAINS,
        "SELECT document FROM inventory_domains WHERE id = ?1;",
        [element.domain_id.as_str()],
    )?
    .ok_or_else(|| RepoError::NotFound {
        collection: DOMAINS,
        id: element.domain_id.clone(),
    })?;

    match domain.first_unknown_tag(&element.tags) {
        Some(tag_id) => Err(RepoError::UnknownTag {
            domain_id: domain.id,
            tag_id: tag_id.clone(),
        }),
        None => Ok(()),
    }
}
