//! Class repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist class documents in the `inventory_classes` collection.
//! - Keep the unique `name` key column in sync with the document.
//!
//! # Invariants
//! - Class names are unique (enforced by a `UNIQUE` column).
//! - A class referenced by any element cannot be deleted.

use crate::model::class::InventoryClass;
use crate::repo::document::{
    encode, ensure_collections_ready, query_document, query_documents, stale_write_error, CLASSES,
    ELEMENTS,
};
use crate::repo::{map_constraint, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for class documents.
pub trait ClassRepository {
    /// Inserts a new class document.
    fn insert_class(&self, class: &InventoryClass) -> RepoResult<()>;
    /// Loads one class by id.
    fn get_class(&self, id: &str) -> RepoResult<Option<InventoryClass>>;
    /// Loads one class by exact name.
    fn find_class_by_name(&self, name: &str) -> RepoResult<Option<InventoryClass>>;
    /// Lists every class ordered by name.
    fn list_classes(&self) -> RepoResult<Vec<InventoryClass>>;
    /// Writes `class` if the stored version still equals `class.version`,
    /// then bumps `class.version`.
    fn update_class(&self, class: &mut InventoryClass) -> RepoResult<()>;
    /// Returns whether any element references the class.
    fn is_class_referenced(&self, id: &str) -> RepoResult<bool>;
    /// Deletes one class. Fails with `Referenced` while elements use it.
    fn delete_class(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed class repository.
pub struct SqliteClassRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClassRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_collections_ready(conn, &[CLASSES, ELEMENTS])?;
        Ok(Self { conn })
    }
}

impl ClassRepository for SqliteClassRepository<'_> {
    fn insert_class(&self, class: &InventoryClass) -> RepoResult<()> {
        let document = encode(CLASSES, class)?;
        self.conn
            .execute(
                "INSERT INTO inventory_classes (id, name, version, document)
                 VALUES (?1, ?2, ?3, ?4);",
                params![class.id, class.name, class.version, document],
            )
            .map_err(|err| map_constraint(err, CLASSES, &class.name))?;
        Ok(())
    }

    fn get_class(&self, id: &str) -> RepoResult<Option<InventoryClass>> {
        query_document(
            self.conn,
            CLASSES,
            "SELECT document FROM inventory_classes WHERE id = ?1;",
            [id],
        )
    }

    fn find_class_by_name(&self, name: &str) -> RepoResult<Option<InventoryClass>> {
        query_document(
            self.conn,
            CLASSES,
            "SELECT document FROM inventory_classes WHERE name = ?1;",
            [name],
        )
    }

    fn list_classes(&self) -> RepoResult<Vec<InventoryClass>> {
        query_documents(
            self.conn,
            CLASSES,
            "SELECT document FROM inventory_classes ORDER BY name ASC, id ASC;",
            [],
        )
    }

    fn update_class(&self, class: &mut InventoryClass) -> RepoResult<()> {
        let expected = class.version;
        class.version = expected + 1;
        let result = write_class(self.conn, class, expected);
        if result.is_err() {
            class.version = expected;
        }
        result
    }

    fn is_class_referenced(&self, id: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM inventory_elements WHERE class_id = ?1
            );",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_class(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM inventory_classes WHERE id = ?1;", [id])
            .map_err(|err| map_constraint(err, CLASSES, id))?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                collection: CLASSES,
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn write_class(conn: &Connection, class: &InventoryClass, expected: i64) -> RepoResult<()> {
    let document = encode(CLASSES, class)?;
    let changed = conn
        .execute(
            "UPDATE inventory_classes
             SET name = ?2, version = ?3, document = ?4
             WHERE id = ?1 AND version = ?5;",
            params![class.id, class.name, class.version, document, expected],
        )
        .map_err(|err| map_constraint(err, CLASSES, &class.name))?;
    if changed == 0 {
        return Err(stale_write_error(conn, CLASSES, &class.id, expected));
    }
    Ok(())
}
