//! Integration tests for the schema service client and sync driver, backed by
//! a wiremock server.

#![allow(clippy::unwrap_used)]

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lattice_core::sync::{
    AlwaysConfirm, ConfirmAction, SchemaServiceClient, SyncOptions, sync_entities,
};
use lattice_idl::{IdlKind, IdlNode, StructureRecord};

struct NeverConfirm;

impl ConfirmAction for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

fn person_entity() -> IdlNode {
    let mut person = IdlNode::object();
    person.set_identity("org.acme", "Person");
    person.add_property("id", IdlNode::new(IdlKind::String));
    person.add_property("firstName", IdlNode::new(IdlKind::String));
    person
}

fn remote_record(published: bool) -> StructureRecord {
    let mut record = StructureRecord::from_entity(&person_entity()).unwrap();
    record.published = published;
    record
}

fn client_for(server: &MockServer) -> SchemaServiceClient {
    let base = url::Url::parse(&server.uri()).unwrap();
    SchemaServiceClient::new(base).unwrap()
}

#[tokio::test]
async fn creates_structure_when_service_has_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/structures/org.acme.person"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/structures"))
        .and(body_string_contains("org.acme.person"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_record(false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = sync_entities(
        &client,
        &[person_entity()],
        &AlwaysConfirm,
        SyncOptions::default(),
    )
    .await;

    assert_eq!(report.synced, vec!["org.acme.person".to_string()]);
    assert!(report.skipped.is_empty());
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn saves_existing_unpublished_structure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/structures/org.acme.person"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_record(false)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/structures/org.acme.person"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_record(false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = sync_entities(
        &client,
        &[person_entity()],
        &AlwaysConfirm,
        SyncOptions::default(),
    )
    .await;

    assert_eq!(report.synced.len(), 1);
}

#[tokio::test]
async fn published_structure_requires_confirmed_unpublish() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/structures/org.acme.person"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_record(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/structures/org.acme.person/unpublish"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/structures/org.acme.person"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_record(false)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/structures/org.acme.person/publish"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = sync_entities(
        &client,
        &[person_entity()],
        &AlwaysConfirm,
        SyncOptions { publish: true },
    )
    .await;

    assert_eq!(report.synced.len(), 1);
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn declined_unpublish_skips_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/structures/org.acme.person"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_record(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/structures/org.acme.person/unpublish"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/structures/org.acme.person"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = sync_entities(
        &client,
        &[person_entity()],
        &NeverConfirm,
        SyncOptions::default(),
    )
    .await;

    assert_eq!(report.skipped, vec!["org.acme.person".to_string()]);
    assert!(report.synced.is_empty());
}

#[tokio::test]
async fn failed_entity_does_not_abort_siblings() {
    let mut other = IdlNode::object();
    other.set_identity("org.acme", "Widget");
    other.add_property("id", IdlNode::new(IdlKind::String));

    let server = MockServer::start().await;
    // Person: service falls over.
    Mock::given(method("GET"))
        .and(path("/api/structures/org.acme.person"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    // Widget: plain create.
    Mock::given(method("GET"))
        .and(path("/api/structures/org.acme.widget"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/structures"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            StructureRecord::from_entity(&other).unwrap(),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = sync_entities(
        &client,
        &[person_entity(), other],
        &AlwaysConfirm,
        SyncOptions::default(),
    )
    .await;

    assert_eq!(report.synced, vec!["org.acme.widget".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "org.acme.person");
    assert!(report.failed[0].1.contains("500"));
}

#[tokio::test]
async fn delete_by_id_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/structures/org.acme.person"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete_by_id("org.acme.person").await.unwrap();
}
