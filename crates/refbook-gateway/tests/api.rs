//! HTTP API tests against the full router.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Days, NaiveDate};
use refbook_core::{CatalogStore, FixedClock, NewCatalog, NewEntry, NewVersion};
use refbook_gateway::{create_router, AppState, GatewayConfig};
use serde_json::{json, Value};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
}

fn server_with(store: &CatalogStore) -> TestServer {
    let state = AppState::new(
        store.clone(),
        Arc::new(FixedClock(today())),
        GatewayConfig::default(),
    );
    TestServer::new(create_router(state)).unwrap()
}

/// Three catalogs with one version each: yesterday, tomorrow, yesterday.
fn seed_catalogs(store: &CatalogStore) -> Vec<i64> {
    let offsets = [
        ("ref_book1", "Reference book 1", today() - Days::new(1)),
        ("ref_book2", "Reference book 2", today() + Days::new(1)),
        ("ref_book3", "Reference book 3", today() - Days::new(1)),
    ];
    offsets
        .iter()
        .enumerate()
        .map(|(i, (code, name, date))| {
            let catalog = store.create_catalog(NewCatalog::new(*code, *name)).unwrap();
            let version = store
                .create_version(catalog.id, NewVersion::new("1.0", *date))
                .unwrap();
            store
                .create_entry(
                    version.id,
                    NewEntry::new(format!("code{}", i + 1), format!("Value {}", i + 1)),
                )
                .unwrap();
            catalog.id
        })
        .collect()
}

/// `ref_book1` with `1.0` effective yesterday and `2.0` effective today.
fn seed_versions(store: &CatalogStore) -> i64 {
    let catalog = store
        .create_catalog(NewCatalog::new("ref_book1", "Reference book 1"))
        .unwrap();
    let v1 = store
        .create_version(catalog.id, NewVersion::new("1.0", today() - Days::new(1)))
        .unwrap();
    let v2 = store
        .create_version(catalog.id, NewVersion::new("2.0", today()))
        .unwrap();
    for (version, code, value) in [
        (&v1, "elem3", "Element 3"),
        (&v2, "elem1", "Element 1"),
        (&v2, "elem2", "Element 2"),
    ] {
        store
            .create_entry(version.id, NewEntry::new(code, value))
            .unwrap();
    }
    catalog.id
}

fn codes(body: &Value, key: &str) -> Vec<String> {
    body[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["code"].as_str().unwrap().to_string())
        .collect()
}

// ============== /refbooks ==============

#[tokio::test]
async fn test_list_all_refbooks() {
    let store = CatalogStore::in_memory().unwrap();
    let ids = seed_catalogs(&store);
    let server = server_with(&store);

    let response = server.get("/refbooks/").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(codes(&body, "refbooks"), ["ref_book1", "ref_book2", "ref_book3"]);
    assert_eq!(
        body["refbooks"][0],
        json!({ "id": ids[0], "code": "ref_book1", "name": "Reference book 1" })
    );
}

#[tokio::test]
async fn test_list_refbooks_by_date() {
    let store = CatalogStore::in_memory().unwrap();
    seed_catalogs(&store);
    let server = server_with(&store);
    let yesterday = today() - Days::new(1);

    let response = server.get(&format!("/refbooks?date={yesterday}")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(codes(&body, "refbooks"), ["ref_book1", "ref_book3"]);
}

#[tokio::test]
async fn test_list_refbooks_bad_date() {
    let store = CatalogStore::in_memory().unwrap();
    let server = server_with(&store);

    let response = server.get("/refbooks/?date=02.09.2024").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "date": ["Date has wrong format. Use one of these formats instead: YYYY-MM-DD."] })
    );
}

#[tokio::test]
async fn test_list_refbooks_empty_store() {
    let store = CatalogStore::in_memory().unwrap();
    let server = server_with(&store);

    let response = server.get("/refbooks").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "refbooks": [] }));
}

// ============== /refbooks/{id}/elements ==============

#[tokio::test]
async fn test_elements_of_current_version() {
    let store = CatalogStore::in_memory().unwrap();
    let id = seed_versions(&store);
    let server = server_with(&store);

    let response = server.get(&format!("/refbooks/{id}/elements/")).await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({
            "elements": [
                { "code": "elem1", "value": "Element 1" },
                { "code": "elem2", "value": "Element 2" },
            ]
        })
    );
}

#[tokio::test]
async fn test_elements_of_explicit_version() {
    let store = CatalogStore::in_memory().unwrap();
    let id = seed_versions(&store);
    let server = server_with(&store);

    let response = server.get(&format!("/refbooks/{id}/elements?version=1.0")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(codes(&body, "elements"), ["elem3"]);
}

#[tokio::test]
async fn test_elements_unknown_version_or_catalog_is_empty() {
    let store = CatalogStore::in_memory().unwrap();
    let id = seed_versions(&store);
    let server = server_with(&store);

    for path in [
        format!("/refbooks/{id}/elements/?version=9.9"),
        "/refbooks/999/elements/".to_string(),
    ] {
        let response = server.get(&path).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "elements": [] }), "{path}");
    }
}

#[tokio::test]
async fn test_elements_version_too_long() {
    let store = CatalogStore::in_memory().unwrap();
    let id = seed_versions(&store);
    let server = server_with(&store);
    let version = "9".repeat(51);

    let response = server
        .get(&format!("/refbooks/{id}/elements/?version={version}"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "version": ["Ensure this field has no more than 50 characters."] })
    );
}

#[tokio::test]
async fn test_elements_non_numeric_id_not_found() {
    let store = CatalogStore::in_memory().unwrap();
    let server = server_with(&store);

    let response = server.get("/refbooks/abc/elements/").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// ============== /refbooks/{id}/check_element ==============

#[tokio::test]
async fn test_check_element_exists() {
    let store = CatalogStore::in_memory().unwrap();
    let id = seed_versions(&store);
    let server = server_with(&store);

    let response = server
        .get(&format!("/refbooks/{id}/check_element/?code=elem1&value=Element%201"))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "exists": true }));

    let response = server
        .get(&format!(
            "/refbooks/{id}/check_element/?code=elem3&value=Element%203&version=1.0"
        ))
        .await;
    assert_eq!(response.json::<Value>(), json!({ "exists": true }));
}

#[tokio::test]
async fn test_check_element_missing() {
    let store = CatalogStore::in_memory().unwrap();
    let id = seed_versions(&store);
    let server = server_with(&store);

    for query in [
        "code=elem1&value=wrong",
        "code=elem3&value=Element%203",
        "code=elem1&value=Element%201&version=1.0",
        "code=elem1&value=Element%201&version=9.9",
    ] {
        let response = server
            .get(&format!("/refbooks/{id}/check_element/?{query}"))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "exists": false }), "{query}");
    }
}

#[tokio::test]
async fn test_check_element_requires_parameters() {
    let store = CatalogStore::in_memory().unwrap();
    let id = seed_versions(&store);
    let server = server_with(&store);

    let response = server.get(&format!("/refbooks/{id}/check_element/")).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "code": ["This field is required."],
            "value": ["This field is required."],
        })
    );

    let response = server
        .get(&format!("/refbooks/{id}/check_element/?value=Element%201"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "code": ["This field is required."] })
    );
}

#[tokio::test]
async fn test_check_element_length_limits() {
    let store = CatalogStore::in_memory().unwrap();
    let id = seed_versions(&store);
    let server = server_with(&store);
    let code = "c".repeat(101);
    let value = "v".repeat(301);

    let response = server
        .get(&format!(
            "/refbooks/{id}/check_element/?code={code}&value={value}"
        ))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "code": ["Ensure this field has no more than 100 characters."],
            "value": ["Ensure this field has no more than 300 characters."],
        })
    );
}

// ============== Other routes ==============

#[tokio::test]
async fn test_overview() {
    let store = CatalogStore::in_memory().unwrap();
    let id = seed_versions(&store);
    let server = server_with(&store);

    let response = server.get("/refbooks/overview").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({
            "refbooks": [{
                "id": id,
                "code": "ref_book1",
                "name": "Reference book 1",
                "current_version": "2.0",
                "version_date": today().to_string(),
            }]
        })
    );

    let before = today() - Days::new(2);
    let response = server.get(&format!("/refbooks/overview/?date={before}")).await;
    let body: Value = response.json();
    assert_eq!(body["refbooks"][0]["current_version"], Value::Null);
    assert_eq!(body["refbooks"][0]["version_date"], Value::Null);
}

#[tokio::test]
async fn test_health() {
    let store = CatalogStore::in_memory().unwrap();
    let server = server_with(&store);

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store_connected"], true);
}

#[tokio::test]
async fn test_openapi_document() {
    let store = CatalogStore::in_memory().unwrap();
    let server = server_with(&store);

    let response = server.get("/openapi.json").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["openapi"], "3.0.3");
    assert!(body["paths"]["/refbooks/{id}/check_element/"].is_object());
}
