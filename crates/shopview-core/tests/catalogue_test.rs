#![allow(clippy::unwrap_used)]
// End-to-end loader tests: a real `HttpSource` against wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopview_core::{
    Catalogue, CatalogueConfig, CatalogueView, HttpSource, LoadOutcome, LoadPhase, Presentation,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn catalogue_for(server_uri: &str) -> Catalogue<HttpSource> {
    let endpoint = Url::parse(&format!("{server_uri}/products")).unwrap();
    let mut config = CatalogueConfig::new(endpoint);
    config.timeout = Some(Duration::from_secs(5));
    Catalogue::from_config(&config).unwrap()
}

fn three_products() -> serde_json::Value {
    json!([
        { "id": 1, "title": "Blue Shirt", "price": 19.99, "image": "https://img/1.png" },
        { "id": 2, "title": "Red Hat", "price": 9.5, "image": "https://img/2.png" },
        { "id": 3, "title": "blue Jeans", "price": 49.0, "image": "https://img/3.png" }
    ])
}

async fn mount(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(template)
        .mount(server)
        .await;
}

fn titles(catalogue: &Catalogue<HttpSource>) -> Vec<String> {
    catalogue
        .state()
        .products()
        .iter()
        .map(|p| p.title.clone())
        .collect()
}

// ── Initial state ───────────────────────────────────────────────────

#[tokio::test]
async fn test_initial_state_is_loading() {
    let server = MockServer::start().await;
    let catalogue = catalogue_for(&server.uri());

    let state = catalogue.state();
    assert!(state.products().is_empty());
    assert!(state.is_loading());
    assert!(!state.has_error());
}

// ── Success ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_success_preserves_order() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(three_products())).await;

    let catalogue = catalogue_for(&server.uri());
    assert_eq!(catalogue.load().await, LoadOutcome::Loaded { count: 3 });

    let state = catalogue.state();
    assert!(!state.is_loading());
    assert!(!state.has_error());
    assert_eq!(titles(&catalogue), ["Blue Shirt", "Red Hat", "blue Jeans"]);
}

#[tokio::test]
async fn test_negative_and_fractional_ids_load() {
    let server = MockServer::start().await;
    let body = json!([
        { "id": -1, "title": "Gift Card", "price": 25.0, "image": "" },
        { "id": 2.5, "title": "Sample", "price": 0.0, "image": "" },
        { "id": "sku-3", "title": "Tote", "price": 12.0, "image": "" }
    ]);
    mount(&server, ResponseTemplate::new(200).set_body_json(body)).await;

    let catalogue = catalogue_for(&server.uri());
    assert_eq!(catalogue.load().await, LoadOutcome::Loaded { count: 3 });

    let state = catalogue.state();
    assert!(!state.has_error());
    let ids: Vec<_> = state.products().iter().map(|p| p.id.to_string()).collect();
    assert_eq!(ids, ["-1", "2.5", "sku-3"]);
}

#[tokio::test]
async fn test_view_filters_loaded_catalogue() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(three_products())).await;

    let catalogue = catalogue_for(&server.uri());
    let mut view = CatalogueView::new();
    view.on_query_changed("BLUE");
    catalogue.load().await;
    view.on_state_changed(catalogue.state());

    let shown: Vec<_> = view.projected().iter().map(|p| p.id.to_string()).collect();
    assert_eq!(shown, ["1", "3"]);

    view.on_query_changed("xyz");
    assert_eq!(view.presentation(), Presentation::NoResults);
}

#[tokio::test]
async fn test_subscriber_sees_transitions() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(three_products())).await;

    let catalogue = catalogue_for(&server.uri());
    let mut rx = catalogue.subscribe();
    assert_eq!(*rx.borrow_and_update(), LoadPhase::Idle);

    let handle = catalogue.spawn_load();
    assert_eq!(*rx.borrow_and_update(), LoadPhase::Loading);

    rx.changed().await.unwrap();
    assert!(matches!(&*rx.borrow(), LoadPhase::Loaded(list) if list.len() == 3));
    assert_eq!(handle.await.unwrap(), LoadOutcome::Loaded { count: 3 });
}

// ── Failure ─────────────────────────────────────────────────────────

async fn assert_failed(catalogue: &Catalogue<HttpSource>) {
    assert_eq!(catalogue.load().await, LoadOutcome::Failed);
    let state = catalogue.state();
    assert!(state.products().is_empty());
    assert!(!state.is_loading());
    assert!(state.has_error());
}

#[tokio::test]
async fn test_server_error_fails() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(500).set_body_string("oops")).await;
    assert_failed(&catalogue_for(&server.uri())).await;
}

#[tokio::test]
async fn test_malformed_body_fails() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;
    assert_failed(&catalogue_for(&server.uri())).await;
}

#[tokio::test]
async fn test_object_body_fails() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "products": [] })),
    )
    .await;
    assert_failed(&catalogue_for(&server.uri())).await;
}

#[tokio::test]
async fn test_negative_price_fails_whole_list() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "Fine", "price": 1.0, "image": "" },
            { "id": 2, "title": "Broken", "price": -3.0, "image": "" }
        ])),
    )
    .await;
    assert_failed(&catalogue_for(&server.uri())).await;
}

#[tokio::test]
async fn test_connection_refused_fails() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    assert_failed(&catalogue_for(&uri)).await;
}

// ── Lifetime ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_exactly_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_products()))
        .expect(1)
        .mount(&server)
        .await;

    let catalogue = catalogue_for(&server.uri());
    let other = catalogue.clone();

    assert_eq!(catalogue.load().await, LoadOutcome::Loaded { count: 3 });
    assert_eq!(catalogue.load().await, LoadOutcome::AlreadyStarted);
    assert_eq!(other.spawn_load().await.unwrap(), LoadOutcome::AlreadyStarted);
}

#[tokio::test]
async fn test_late_response_after_close_is_discarded() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(three_products())
            .set_delay(Duration::from_millis(300)),
    )
    .await;

    let catalogue = catalogue_for(&server.uri());
    let handle = catalogue.spawn_load();
    tokio::time::sleep(Duration::from_millis(50)).await;
    catalogue.close();

    assert_eq!(handle.await.unwrap(), LoadOutcome::Abandoned);
    assert_eq!(catalogue.phase(), LoadPhase::Loading);
    assert!(titles(&catalogue).is_empty());
}

#[tokio::test]
async fn test_late_response_after_drop_is_discarded() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(three_products())
            .set_delay(Duration::from_millis(300)),
    )
    .await;

    let catalogue = catalogue_for(&server.uri());
    let mut rx = catalogue.subscribe();
    let handle = catalogue.spawn_load();
    drop(catalogue);

    assert_eq!(handle.await.unwrap(), LoadOutcome::Abandoned);
    // Sender is gone with the catalogue; nothing after Loading was published.
    assert_eq!(*rx.borrow_and_update(), LoadPhase::Loading);
    assert!(rx.changed().await.is_err());
}
