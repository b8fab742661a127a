// Integration tests for `Controller` against a wiremock record store.
//
// These cover the collection controller's contract: wholesale refresh,
// soft-delete filtering, single-field mutations, and the loading flag.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kennel_core::{Controller, CoreError, DogFields, NoticeLevel, RecordId, StoreConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let url = server.uri().parse().expect("mock server URI is a URL");
    let controller = Controller::new(StoreConfig::new(url)).expect("controller builds");
    (server, controller)
}

fn dog_json(id: &str, name: &str, breed: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "breed": breed })
}

fn list_body(dogs: &[serde_json::Value]) -> serde_json::Value {
    json!({ "success": true, "data": dogs })
}

fn buddy_fields() -> DogFields {
    DogFields {
        name: "Buddy".into(),
        breed: "Golden Retriever".into(),
        age: Some(3),
        color: None,
        image_url: None,
        description: None,
        is_favorite: false,
    }
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_replaces_collection_preserving_store_order() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[
            dog_json("c", "Rex", "Boxer"),
            dog_json("a", "Ace", "Beagle"),
            dog_json("b", "Bo", "Corgi"),
        ])))
        .mount(&server)
        .await;

    controller.refresh().await.expect("refresh succeeds");

    let snap = controller.dogs_snapshot();
    let names: Vec<&str> = snap.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["Rex", "Ace", "Bo"]);
    assert!(!controller.store().loading());
}

#[tokio::test]
async fn refresh_filters_soft_deleted_records() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": "a", "name": "Ace", "breed": "Beagle" },
                { "id": "b", "name": "Bo", "breed": "Corgi", "deleted": true },
            ]
        })))
        .mount(&server)
        .await;

    controller.refresh().await.expect("refresh succeeds");

    let snap = controller.dogs_snapshot();
    assert_eq!(snap.len(), 1);
    assert_eq!(snap[0].name, "Ace");
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot_and_clears_loading() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_body(&[dog_json("a", "Ace", "Beagle")])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    controller.refresh().await.expect("first refresh succeeds");
    let result = controller.refresh().await;

    assert!(matches!(result, Err(CoreError::Api { .. })));
    let snap = controller.dogs_snapshot();
    assert_eq!(snap.len(), 1, "prior collection must be untouched");
    assert_eq!(snap[0].name, "Ace");
    assert!(!controller.store().loading());
}

#[tokio::test]
async fn loading_flag_is_raised_during_refresh_and_cleared_after() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_body(&[]))
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let mut loading = controller.store().subscribe_loading();
    assert!(!*loading.borrow_and_update());

    let ctrl = controller.clone();
    let task = tokio::spawn(async move { ctrl.refresh().await });

    loading.changed().await.expect("loading change");
    assert!(*loading.borrow_and_update(), "flag raised while in flight");

    loading.changed().await.expect("loading change");
    assert!(!*loading.borrow_and_update(), "flag cleared on completion");

    task.await.expect("join").expect("refresh succeeds");
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_buddy_end_to_end() {
    let (server, controller) = setup().await;

    let created = json!({
        "id": "dog-1",
        "name": "Buddy",
        "breed": "Golden Retriever",
        "age": 3,
        "isFavorite": false,
        "deleted": false,
    });

    Mock::given(method("POST"))
        .and(path("/api/v1/dogs"))
        .and(body_json(json!({
            "name": "Buddy",
            "breed": "Golden Retriever",
            "age": 3,
            "isFavorite": false,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[created.clone()])))
        .mount(&server)
        .await;

    let record = controller
        .create(&buddy_fields())
        .await
        .expect("create succeeds");
    assert_eq!(record.id, RecordId::from("dog-1"));

    let snap = controller.dogs_snapshot();
    assert_eq!(snap.len(), 1);
    let dog = &snap[0];
    assert_eq!(dog.name, "Buddy");
    assert_eq!(dog.breed, "Golden Retriever");
    assert_eq!(dog.age, Some(3));
    assert!(!dog.is_favorite);
    assert!(!dog.deleted);
}

#[tokio::test]
async fn remove_soft_deletes_and_drops_record_from_next_snapshot() {
    let (server, controller) = setup().await;

    // Initial list contains the record; after the soft delete it is gone.
    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_body(&[dog_json("dog-1", "Rex", "Boxer")])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/dogs/dog-1"))
        .and(body_json(json!({ "deleted": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "dog-1",
            "name": "Rex",
            "breed": "Boxer",
            "deleted": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[])))
        .mount(&server)
        .await;

    controller.refresh().await.expect("initial refresh");
    assert_eq!(controller.dogs_snapshot().len(), 1);

    controller
        .remove(&RecordId::from("dog-1"))
        .await
        .expect("remove succeeds");

    assert!(
        controller.dogs_snapshot().is_empty(),
        "removed id must be absent after the next refresh"
    );
}

#[tokio::test]
async fn failed_remove_leaves_collection_unchanged() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_body(&[dog_json("dog-1", "Rex", "Boxer")])),
        )
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/dogs/dog-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    controller.refresh().await.expect("initial refresh");

    let result = controller.remove(&RecordId::from("dog-1")).await;

    assert!(matches!(result, Err(CoreError::Api { .. })));
    assert_eq!(controller.dogs_snapshot().len(), 1);
}

#[tokio::test]
async fn toggle_favorite_flips_exactly_that_field() {
    let (server, controller) = setup().await;

    let favorite = json!({
        "id": "dog-1",
        "name": "Luna",
        "breed": "Husky",
        "isFavorite": true,
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[favorite.clone()])))
        .mount(&server)
        .await;

    // The record is currently a favorite, so the PATCH body must be
    // exactly {"isFavorite": false} — no other fields.
    Mock::given(method("PATCH"))
        .and(path("/api/v1/dogs/dog-1"))
        .and(body_json(json!({ "isFavorite": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "dog-1",
            "name": "Luna",
            "breed": "Husky",
            "isFavorite": false,
        })))
        .expect(1)
        .mount(&server)
        .await;

    controller.refresh().await.expect("initial refresh");
    let record = controller
        .store()
        .dog_by_id(&RecordId::from("dog-1"))
        .expect("record present");

    controller
        .toggle_favorite(&record)
        .await
        .expect("toggle succeeds");
}

// ── Validation boundary ─────────────────────────────────────────────

#[tokio::test]
async fn invalid_fields_never_reach_the_store() {
    let (server, controller) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let fields = DogFields {
        name: String::new(),
        ..buddy_fields()
    };
    let result = controller.create(&fields).await;

    assert!(matches!(result, Err(CoreError::Validation(_))));
}

// ── Post-mutation refresh failures ──────────────────────────────────

#[tokio::test]
async fn post_mutation_refresh_failure_is_a_notice_not_an_error() {
    let (server, controller) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/dogs/dog-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "dog-1",
            "name": "Rex",
            "breed": "Boxer",
            "deleted": true,
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut notices = controller.notices();

    controller
        .remove(&RecordId::from("dog-1"))
        .await
        .expect("the mutation itself succeeded");

    let notice = notices.recv().await.expect("a notice was broadcast");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("Failed to reload dogs"));
}
