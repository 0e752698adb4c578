//! Command dispatch: one service call per command.

use crate::args::{ClassCommands, Commands, DomainCommands, ElementCommands, ElementListArgs};
use crate::error::{CliError, CliResult};
use inventory_core::{
    open_db, ClassService, DomainService, ElementListQuery, ElementService, ParentFilter,
    SqliteClassRepository, SqliteDomainRepository, SqliteElementRepository,
};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;

/// Opens the catalog at `db_path` and runs `command` as `actor`.
pub fn execute(db_path: &Path, actor: &str, command: Commands) -> CliResult<Value> {
    let conn = open_db(db_path)?;
    match command {
        Commands::Class { command } => run_class(&conn, actor, command),
        Commands::Domain { command } => run_domain(&conn, actor, command),
        Commands::Element { command } => run_element(&conn, actor, command),
    }
}

fn run_class(conn: &Connection, actor: &str, command: ClassCommands) -> CliResult<Value> {
    let service = ClassService::new(SqliteClassRepository::try_new(conn)?);
    match command {
        ClassCommands::Create { payload } => {
            let id = service.create_class(actor, parse(&payload)?)?;
            Ok(json!({ "id": id }))
        }
        ClassCommands::Get { id } => to_json(&service.find_class(&id)?),
        ClassCommands::List => to_json(&service.list_classes()?),
        ClassCommands::Update { id, payload } => {
            to_json(&service.update_class(actor, &id, parse(&payload)?)?)
        }
        ClassCommands::Delete { id } => {
            service.delete_class(&id)?;
            Ok(json!({ "deleted": id }))
        }
    }
}

fn run_domain(conn: &Connection, actor: &str, command: DomainCommands) -> CliResult<Value> {
    let service = DomainService::new(SqliteDomainRepository::try_new(conn)?);
    match command {
        DomainCommands::Create { payload } => {
            let id = service.create_domain(actor, parse(&payload)?)?;
            Ok(json!({ "id": id }))
        }
        DomainCommands::Get { id } => to_json(&service.get_full_domain(&id)?),
        DomainCommands::List => to_json(&service.list_domains()?),
        DomainCommands::Update { id, payload } => {
            to_json(&service.update_domain(actor, &id, parse(&payload)?)?)
        }
    }
}

fn run_element(conn: &Connection, actor: &str, command: ElementCommands) -> CliResult<Value> {
    let service = ElementService::new(
        SqliteClassRepository::try_new(conn)?,
        SqliteDomainRepository::try_new(conn)?,
        SqliteElementRepository::try_new(conn)?,
    );
    match command {
        ElementCommands::Create { domain_id, payload } => {
            let id = service.create_element(actor, &domain_id, parse(&payload)?)?;
            Ok(json!({ "id": id }))
        }
        ElementCommands::Get {
            domain_id,
            element_id,
        } => to_json(&service.get_full_element(&domain_id, &element_id)?),
        ElementCommands::List { domain_id, filter } => {
            to_json(&service.list_elements(&domain_id, &list_query(filter))?)
        }
        ElementCommands::Update {
            domain_id,
            element_id,
            payload,
        } => to_json(&service.update_element(actor, &domain_id, &element_id, parse(&payload)?)?),
    }
}

fn list_query(filter: ElementListArgs) -> ElementListQuery {
    let parent = match (filter.root, filter.parent) {
        (_, Some(parent_id)) => ParentFilter::Children(parent_id),
        (true, None) => ParentFilter::Root,
        (false, None) => ParentFilter::Any,
    };
    ElementListQuery {
        parent,
        limit: filter.limit,
        offset: filter.offset,
    }
}

fn parse<T: DeserializeOwned>(payload: &str) -> CliResult<T> {
    serde_json::from_str(payload).map_err(CliError::Payload)
}

fn to_json<T: Serialize>(value: &T) -> CliResult<Value> {
    serde_json::to_value(value).map_err(CliError::Payload)
}

#[cfg(test)]
mod tests {
    use super::{execute, list_query};
    use crate::args::{ClassCommands, Commands, DomainCommands, ElementCommands, ElementListArgs};
    use inventory_core::ParentFilter;

    #[test]
    fn list_flags_map_to_parent_filter() {
        assert_eq!(list_query(ElementListArgs::default()).parent, ParentFilter::Any);
        let root = ElementListArgs {
            root: true,
            ..ElementListArgs::default()
        };
        assert_eq!(list_query(root).parent, ParentFilter::Root);
        let children = ElementListArgs {
            parent: Some("e1".to_string()),
            limit: Some(5),
            ..ElementListArgs::default()
        };
        let query = list_query(children);
        assert_eq!(query.parent, ParentFilter::Children("e1".to_string()));
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn commands_share_one_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("catalog.db");

        let class = execute(
            &db,
            "cli",
            Commands::Class {
                command: ClassCommands::Create {
                    payload: r#"{"name":"class a","type":"Building","attributes":[
                        {"name":"Building Number","type":"Number","mandatory":true}]}"#
                        .to_string(),
                },
            },
        )
        .unwrap();
        let domain = execute(
            &db,
            "cli",
            Commands::Domain {
                command: DomainCommands::Create {
                    payload: r#"{"name":"New Domain","tags":[{"name":"tag-a"}]}"#.to_string(),
                },
            },
        )
        .unwrap();

        let class_id = class["id"].as_str().unwrap().to_string();
        let domain_id = domain["id"].as_str().unwrap().to_string();
        let payload = format!(
            r#"{{"name":"Building Control","classId":"{class_id}","attributes":[{{"name":"building-number","value":"34"}}]}}"#
        );
        let created = execute(
            &db,
            "cli",
            Commands::Element {
                command: ElementCommands::Create {
                    domain_id: domain_id.clone(),
                    payload,
                },
            },
        )
        .unwrap();

        let element = execute(
            &db,
            "cli",
            Commands::Element {
                command: ElementCommands::Get {
                    domain_id: domain_id.clone(),
                    element_id: created["id"].as_str().unwrap().to_string(),
                },
            },
        )
        .unwrap();
        assert_eq!(element["classId"], class_id.as_str());
        assert_eq!(element["domainId"], domain_id.as_str());
        assert_eq!(element["createdBy"], "cli");
    }

    #[test]
    fn malformed_payload_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(
            &dir.path().join("catalog.db"),
            "cli",
            Commands::Domain {
                command: DomainCommands::Create {
                    payload: "{not json".to_string(),
                },
            },
        )
        .unwrap_err();
        assert_eq!(err.code(), -1);
        assert!(err.body().message.starts_with("invalid payload"));
    }

    #[test]
    fn catalog_errors_keep_their_code() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(
            &dir.path().join("catalog.db"),
            "cli",
            Commands::Domain {
                command: DomainCommands::Get {
                    id: "missing".to_string(),
                },
            },
        )
        .unwrap_err();
        assert_eq!(err.code(), -2);
    }
}
