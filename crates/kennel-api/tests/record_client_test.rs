// Integration tests for `RecordClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kennel_api::types::DogWrite;
use kennel_api::{Error, RecordClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RecordClient) {
    let server = MockServer::start().await;
    let client = RecordClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_dogs_envelope() {
    let (server, client) = setup().await;

    let body = json!({
        "success": true,
        "data": [
            {
                "id": "dog-1",
                "name": "Buddy",
                "breed": "Golden Retriever",
                "age": 3,
                "isFavorite": true,
            },
            {
                "_id": "dog-2",
                "name": "Luna",
                "breed": "Husky",
                "color": "Gray",
            },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let dogs = client.list_dogs().await.unwrap();

    assert_eq!(dogs.len(), 2);
    assert_eq!(dogs[0].id, "dog-1");
    assert_eq!(dogs[0].name, "Buddy");
    assert_eq!(dogs[0].age, Some(3));
    assert!(dogs[0].is_favorite);
    assert_eq!(dogs[1].id, "dog-2");
    assert_eq!(dogs[1].color.as_deref(), Some("Gray"));
    assert!(!dogs[1].deleted);
}

#[tokio::test]
async fn test_list_dogs_preserves_store_order() {
    let (server, client) = setup().await;

    let body = json!({
        "success": true,
        "data": [
            { "id": "c", "name": "Rex", "breed": "Boxer" },
            { "id": "a", "name": "Ace", "breed": "Beagle" },
            { "id": "b", "name": "Bo", "breed": "Corgi" },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let dogs = client.list_dogs().await.unwrap();
    let ids: Vec<&str> = dogs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["c", "a", "b"]);
}

#[tokio::test]
async fn test_create_dog() {
    let (server, client) = setup().await;

    let expected_body = json!({
        "name": "Buddy",
        "breed": "Golden Retriever",
        "age": 3,
        "isFavorite": false,
    });

    let response_body = json!({
        "id": "dog-9",
        "name": "Buddy",
        "breed": "Golden Retriever",
        "age": 3,
        "isFavorite": false,
        "deleted": false,
    });

    Mock::given(method("POST"))
        .and(path("/api/v1/dogs"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(201).set_body_json(&response_body))
        .mount(&server)
        .await;

    let write = DogWrite {
        name: Some("Buddy".into()),
        breed: Some("Golden Retriever".into()),
        age: Some(3),
        is_favorite: Some(false),
        ..DogWrite::default()
    };

    let dog = client.create_dog(&write).await.unwrap();

    assert_eq!(dog.id, "dog-9");
    assert_eq!(dog.name, "Buddy");
    assert_eq!(dog.age, Some(3));
    assert!(!dog.is_favorite);
}

#[tokio::test]
async fn test_update_dog_sends_only_populated_fields() {
    let (server, client) = setup().await;

    // A soft-delete must send exactly `{"deleted": true}` — no other keys.
    Mock::given(method("PATCH"))
        .and(path("/api/v1/dogs/dog-3"))
        .and(body_json(json!({ "deleted": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "dog-3",
            "name": "Rex",
            "breed": "Boxer",
            "deleted": true,
        })))
        .mount(&server)
        .await;

    let dog = client
        .update_dog("dog-3", &DogWrite::soft_delete())
        .await
        .unwrap();

    assert_eq!(dog.id, "dog-3");
    assert!(dog.deleted);
}

#[tokio::test]
async fn test_update_dog_favorite_toggle_body() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/dogs/dog-4"))
        .and(body_json(json!({ "isFavorite": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "dog-4",
            "name": "Luna",
            "breed": "Husky",
            "isFavorite": true,
        })))
        .mount(&server)
        .await;

    let dog = client
        .update_dog("dog-4", &DogWrite::favorite(true))
        .await
        .unwrap();

    assert!(dog.is_favorite);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_envelope_rejection() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "store unavailable",
            "data": [],
        })))
        .mount(&server)
        .await;

    let result = client.list_dogs().await;

    match result {
        Err(Error::Rejected { ref message }) => assert_eq!(message, "store unavailable"),
        other => panic!("expected Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_404_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/dogs/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not found" })))
        .mount(&server)
        .await;

    let err = client
        .update_dog("missing", &DogWrite::soft_delete())
        .await
        .expect_err("missing record should error");

    assert!(err.is_not_found());
    match err {
        Error::Api {
            status,
            ref message,
            ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not found");
        }
        other => panic!("expected Api 404 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_422_validation() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "breed must not be empty",
            "code": "VALIDATION_ERROR",
        })))
        .mount(&server)
        .await;

    let write = DogWrite {
        name: Some("Buddy".into()),
        breed: Some(String::new()),
        ..DogWrite::default()
    };
    let result = client.create_dog(&write).await;

    match result {
        Err(Error::Api {
            status,
            ref message,
            ref code,
        }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "breed must not be empty");
            assert_eq!(code.as_deref(), Some("VALIDATION_ERROR"));
        }
        other => panic!("expected Api 422 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_500_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.list_dogs().await;

    match result {
        Err(Error::Api { status, ref code, .. }) => {
            assert_eq!(status, 500);
            assert!(code.is_none());
        }
        other => panic!("expected Api 500 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dogs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_dogs().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization, got: {result:?}"
    );
}
