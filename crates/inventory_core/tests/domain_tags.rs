use inventory_core::{
    open_db_in_memory, AttributeType, ClassService, DomainService, ElementService,
    InventoryClassAttribute, InventoryClassType, InventoryError, NewInventoryClass,
    NewInventoryDomain, NewInventoryElement, SqliteClassRepository, SqliteDomainRepository,
    SqliteElementRepository, TagInput, UpdateInventoryDomain, UpdateInventoryElement,
    ValidationError,
};
use rusqlite::Connection;

const ACTOR: &str = "tester";

fn domain_service(conn: &Connection) -> DomainService<SqliteDomainRepository<'_>> {
    DomainService::new(SqliteDomainRepository::try_new(conn).unwrap())
}

fn domain_request(name: &str, tags: &[&str]) -> NewInventoryDomain {
    NewInventoryDomain {
        name: name.to_string(),
        description: None,
        tags: tags.iter().map(|tag| TagInput::named(*tag)).collect(),
    }
}

#[test]
fn create_domain_derives_slugs_and_tag_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = domain_service(&conn);

    let id = service
        .create_domain(ACTOR, domain_request("New Domain", &["tag a", "Tag B"]))
        .unwrap();
    let domain = service.get_full_domain(&id).unwrap();

    assert_eq!(domain.name, "New Domain");
    assert_eq!(domain.slug, "new-domain");
    assert_eq!(domain.version, 0);
    assert_eq!(domain.audit.created_by, ACTOR);
    let slugs: Vec<&str> = domain.tags.iter().map(|tag| tag.slug.as_str()).collect();
    assert_eq!(slugs, vec!["tag-a", "tag-b"]);
    let names: Vec<&str> = domain.tags.iter().map(|tag| tag.name.as_str()).collect();
    assert_eq!(names, vec!["tag-a", "tag-b"]);
    assert!(domain.tags.iter().all(|tag| !tag.id.is_empty()));
    assert_ne!(domain.tags[0].id, domain.tags[1].id);
}

#[test]
fn domains_with_same_slug_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = domain_service(&conn);

    service
        .create_domain(ACTOR, domain_request("New Domain", &[]))
        .unwrap();
    let err = service
        .create_domain(ACTOR, domain_request("new domain", &[]))
        .unwrap_err();
    assert!(matches!(err, InventoryError::DomainAlreadyExists(ref slug) if slug == "new-domain"));
    assert_eq!(err.code(), -1);
    assert_eq!(service.list_domains().unwrap().len(), 1);
}

#[test]
fn blank_domain_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = domain_service(&conn);

    let err = service
        .create_domain(ACTOR, domain_request("  ", &[]))
        .unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Validation(ValidationError::MissingField("name"))
    ));

    let err = service
        .create_domain(ACTOR, domain_request("!!!", &[]))
        .unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Validation(ValidationError::InvalidName(_))
    ));
}

#[test]
fn duplicate_tag_slugs_are_rejected_on_create() {
    let conn = open_db_in_memory().unwrap();
    let service = domain_service(&conn);

    let err = service
        .create_domain(ACTOR, domain_request("New Domain", &["Tag A", "tag-a"]))
        .unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Validation(ValidationError::DuplicateTag(_))
    ));
    assert!(service.list_domains().unwrap().is_empty());
}

#[test]
fn rename_one_tag_and_remove_the_other() {
    let conn = open_db_in_memory().unwrap();
    let service = domain_service(&conn);
    let id = service
        .create_domain(ACTOR, domain_request("New Domain", &["tag-a", "tag-b"]))
        .unwrap();
    let created = service.get_full_domain(&id).unwrap();
    let kept_id = created.tags[0].id.clone();

    service
        .update_domain(
            "editor",
            &id,
            UpdateInventoryDomain {
                tags: Some(vec![TagInput::existing(kept_id.clone(), "Updated tag name")]),
                ..UpdateInventoryDomain::default()
            },
        )
        .unwrap();

    let domain = service.get_full_domain(&id).unwrap();
    assert_eq!(domain.tags.len(), 1);
    assert_eq!(domain.tags[0].id, kept_id);
    assert_eq!(domain.tags[0].name, "updated-tag-name");
    assert_eq!(domain.tags[0].slug, "updated-tag-name");
    assert_eq!(domain.version, 1);
    assert_eq!(domain.audit.last_modified_by, "editor");
    assert_eq!(domain.audit.created_by, ACTOR);
}

#[test]
fn unknown_tag_id_in_update_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = domain_service(&conn);
    let id = service
        .create_domain(ACTOR, domain_request("New Domain", &["tag-a"]))
        .unwrap();

    let err = service
        .update_domain(
            ACTOR,
            &id,
            UpdateInventoryDomain {
                tags: Some(vec![TagInput::existing("missing", "tag-x")]),
                ..UpdateInventoryDomain::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, InventoryError::TagNotFound(ref tag) if tag == "missing"));
    assert_eq!(err.code(), -4);
    assert_eq!(service.get_full_domain(&id).unwrap().version, 0);
}

#[test]
fn rename_domain_rechecks_slug_uniqueness() {
    let conn = open_db_in_memory().unwrap();
    let service = domain_service(&conn);
    service
        .create_domain(ACTOR, domain_request("Domain A", &[]))
        .unwrap();
    let id = service
        .create_domain(ACTOR, domain_request("Domain B", &[]))
        .unwrap();

    let err = service
        .update_domain(
            ACTOR,
            &id,
            UpdateInventoryDomain {
                name: Some("domain a".to_string()),
                ..UpdateInventoryDomain::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, InventoryError::DomainAlreadyExists(_)));

    let renamed = service
        .update_domain(
            ACTOR,
            &id,
            UpdateInventoryDomain {
                name: Some("Domain B (east)".to_string()),
                description: Some("East wing".to_string()),
                ..UpdateInventoryDomain::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.slug, "domain-b-east");
    assert_eq!(renamed.description.as_deref(), Some("East wing"));
}

#[test]
fn stale_domain_version_conflicts() {
    let conn = open_db_in_memory().unwrap();
    let service = domain_service(&conn);
    let id = service
        .create_domain(ACTOR, domain_request("New Domain", &[]))
        .unwrap();
    service
        .update_domain(ACTOR, &id, UpdateInventoryDomain::default())
        .unwrap();

    let err = service
        .update_domain(
            ACTOR,
            &id,
            UpdateInventoryDomain {
                description: Some("late write".to_string()),
                version: Some(0),
                ..UpdateInventoryDomain::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Conflict { expected: 0, actual: 1, .. }
    ));
    assert_eq!(err.code(), -6);
}

#[test]
fn unknown_domain_reports_domain_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = domain_service(&conn);

    assert!(matches!(
        service.get_full_domain("missing"),
        Err(InventoryError::DomainNotFound(_))
    ));
    let err = service
        .update_domain(ACTOR, "missing", UpdateInventoryDomain::default())
        .unwrap_err();
    assert_eq!(err.code(), -2);
}

#[test]
fn list_domains_is_ordered_by_slug() {
    let conn = open_db_in_memory().unwrap();
    let service = domain_service(&conn);
    for name in ["Zeta", "Alpha", "Mid Campus"] {
        service.create_domain(ACTOR, domain_request(name, &[])).unwrap();
    }

    let slugs: Vec<String> = service
        .list_domains()
        .unwrap()
        .into_iter()
        .map(|summary| summary.slug)
        .collect();
    assert_eq!(slugs, vec!["alpha", "mid-campus", "zeta"]);
}

#[test]
fn removed_tags_are_pulled_from_elements() {
    let conn = open_db_in_memory().unwrap();
    let domains = domain_service(&conn);
    let classes = ClassService::new(SqliteClassRepository::try_new(&conn).unwrap());
    let elements = ElementService::new(
        SqliteClassRepository::try_new(&conn).unwrap(),
        SqliteDomainRepository::try_new(&conn).unwrap(),
        SqliteElementRepository::try_new(&conn).unwrap(),
    );

    let class_id = classes
        .create_class(
            ACTOR,
            NewInventoryClass {
                name: "rooms".to_string(),
                description: None,
                kind: InventoryClassType::Room,
                attributes: vec![InventoryClassAttribute::new(
                    "Seats",
                    AttributeType::Number,
                    false,
                )],
            },
        )
        .unwrap();
    let domain_id = domains
        .create_domain(ACTOR, domain_request("New Domain", &["tag-a", "tag-b"]))
        .unwrap();
    let tags = domains.get_full_domain(&domain_id).unwrap().tags;

    let element_id = elements
        .create_element(
            ACTOR,
            &domain_id,
            NewInventoryElement {
                name: "Room 1".to_string(),
                class_id: Some(class_id),
                tags: vec![tags[0].id.clone(), tags[1].id.clone()],
                ..NewInventoryElement::default()
            },
        )
        .unwrap();

    domains
        .update_domain(
            "editor",
            &domain_id,
            UpdateInventoryDomain {
                tags: Some(vec![TagInput::from(&tags[0])]),
                ..UpdateInventoryDomain::default()
            },
        )
        .unwrap();

    let element = elements.get_full_element(&domain_id, &element_id).unwrap();
    assert_eq!(element.tags, vec![tags[0].clone()]);
    assert_eq!(element.version, 1);
    assert_eq!(element.audit.last_modified_by, "editor");

    let err = elements
        .update_element(
            ACTOR,
            &domain_id,
            &element_id,
            UpdateInventoryElement {
                tags: Some(vec![tags[1].id.clone()]),
                ..UpdateInventoryElement::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, InventoryError::TagNotFound(_)));
}
