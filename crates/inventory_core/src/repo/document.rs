//! JSON document plumbing shared by the collection repositories.

use crate::db::migrations::{current_user_version, latest_version};
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub(crate) const CLASSES: &str = "inventory_classes";
pub(crate) const DOMAINS: &str = "inventory_domains";
pub(crate) const ELEMENTS: &str = "inventory_elements";

pub(crate) fn encode<T: Serialize>(collection: &'static str, document: &T) -> RepoResult<String> {
    serde_json::to_string(document).map_err(|err| {
        RepoError::InvalidData(format!("cannot encode {collection} document: {err}"))
    })
}

pub(crate) fn decode<T: DeserializeOwned>(collection: &'static str, text: &str) -> RepoResult<T> {
    serde_json::from_str(text).map_err(|err| {
        RepoError::InvalidData(format!("cannot decode {collection} document: {err}"))
    })
}

/// Verifies schema version and collection tables before a repository is used.
pub(crate) fn ensure_collections_ready(
    conn: &Connection,
    collections: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in collections {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

/// Loads every document returned by `sql`, in row order.
pub(crate) fn query_documents<T: DeserializeOwned>(
    conn: &Connection,
    collection: &'static str,
    sql: &str,
    params: impl rusqlite::Params,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut documents = Vec::new();
    while let Some(row) = rows.next()? {
        let text: String = row.get("document")?;
        documents.push(decode(collection, &text)?);
    }
    Ok(documents)
}

/// Loads the first document returned by `sql`, if any.
pub(crate) fn query_document<T: DeserializeOwned>(
    conn: &Connection,
    collection: &'static str,
    sql: &str,
    params: impl rusqlite::Params,
) -> RepoResult<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => {
            let text: String = row.get("document")?;
            Ok(Some(decode(collection, &text)?))
        }
        None => Ok(None),
    }
}

/// Explains why a conditional write touched no row.
pub(crate) fn stale_write_error(
    conn: &Connection,
    collection: &'static str,
    id: &str,
    expected: i64,
) -> RepoError {
    let lookup = conn.query_row(
        &format!("SELECT version FROM {collection} WHERE id = ?1;"),
        [id],
        |row| row.get::<_, i64>(0),
    );
    match lookup {
        Ok(actual) => RepoError::Conflict {
            collection,
            id: id.to_string(),
            expected,
            actual,
        },
        Err(rusqlite::Error::QueryReturnedNoRows) => RepoError::NotFound {
            collection,
            id: id.to_string(),
        },
        Err(err) => RepoError::from(err),
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
