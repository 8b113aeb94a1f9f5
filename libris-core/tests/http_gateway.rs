//! HttpGateway against a loopback stand-in for the library service

use axum::{
    extract::{Path, Query, RawQuery},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use libris_core::gateway::HttpGateway;
use libris_core::{
    ClientConfig, FeedAggregator, FeedConfig, PayloadSource, SearchFilters, SessionFeedCache,
    SourceError, SourceGateway, WishlistService,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

const TOKEN: &str = "secret-token";

async fn discover(headers: HeaderMap) -> impl IntoResponse {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer secret-token");
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Unauthorized access" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "trending": [{ "id": 1, "title": "Dune", "barcode": "LIB-0001" }],
                "newArrivals": null
            }
        })),
    )
}

async fn recommendations() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "database is down")
}

async fn available() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": [
            { "id": 2, "title": "Emma", "status": "AVAILABLE" },
            { "id": "3", "title": "Beloved", "availableCopies": 1 }
        ]
    }))
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let query = params.get("query").cloned().unwrap_or_default();
    Json(json!({ "success": true, "data": [{ "id": 9, "title": query }] }))
}

async fn advanced_search(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({ "success": true, "data": [{ "id": 10, "title": query.unwrap_or_default() }] }))
}

async fn add_to_wishlist(Path(barcode): Path<String>) -> impl IntoResponse {
    if barcode == "LIB-MISSING" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Book not found" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": format!("Added {}", barcode) })),
    )
}

async fn remove_from_wishlist() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn wishlist() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": [{ "id": 7, "book": { "id": 1, "title": "Dune", "barcode": "LIB-0001" } }]
    }))
}

async fn unavailable() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

/// Serve the stub on an ephemeral port and return its API base
async fn spawn_service() -> String {
    let app = Router::new()
        .route("/api/discover", get(discover))
        .route("/api/recommendations/me", get(recommendations))
        .route("/api/books/available", get(available))
        .route("/api/books/search", get(search))
        .route("/api/books/advanced-search", get(advanced_search))
        .route("/api/wishlist", get(wishlist))
        .route(
            "/api/wishlist/:barcode",
            post(add_to_wishlist).delete(remove_from_wishlist),
        )
        .route("/down/books/available", get(unavailable));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

async fn gateway() -> HttpGateway {
    let base = spawn_service().await;
    HttpGateway::new(&ClientConfig::new(base).with_token(TOKEN)).unwrap()
}

#[tokio::test]
async fn test_fetch_recommendations_unwraps_envelope() {
    let gateway = gateway().await;

    let payload = gateway.fetch_recommendations("discover").await.unwrap();
    assert_eq!(payload.section_names(), vec!["trending", "newArrivals"]);
    assert_eq!(payload.books("trending")[0].id.as_deref(), Some("1"));
    assert!(payload.books("newArrivals").is_empty());
}

#[tokio::test]
async fn test_missing_token_is_an_http_error() {
    let base = spawn_service().await;
    let gateway = HttpGateway::new(&ClientConfig::new(base)).unwrap();

    let err = gateway.fetch_recommendations("discover").await.unwrap_err();
    assert_eq!(
        err,
        SourceError::Http {
            status: 401,
            message: "Unauthorized access".to_string()
        }
    );
}

#[tokio::test]
async fn test_plain_text_error_body_becomes_message() {
    let gateway = gateway().await;

    let err = gateway
        .fetch_recommendations("recommendations")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "database is down");
}

#[tokio::test]
async fn test_empty_error_body_uses_status_line() {
    let base = spawn_service().await.replace("/api", "/down");
    let gateway = HttpGateway::new(&ClientConfig::new(base)).unwrap();

    let err = gateway.fetch_available().await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
}

#[tokio::test]
async fn test_unknown_feed_is_rejected_locally() {
    let gateway = gateway().await;

    let err = gateway.fetch_recommendations("staffPicks").await.unwrap_err();
    assert!(matches!(err, SourceError::UnknownFeed(name) if name == "staffPicks"));
}

#[tokio::test]
async fn test_available_and_search() {
    let gateway = gateway().await;

    let books = gateway.fetch_available().await.unwrap();
    assert_eq!(books.len(), 2);
    assert!(books.iter().all(|b| b.is_available()));

    let books = gateway.fetch_by_search("frank herbert").await.unwrap();
    assert_eq!(books[0].title, "frank herbert");
}

#[tokio::test]
async fn test_advanced_search_sends_filters() {
    let gateway = gateway().await;
    let filters = SearchFilters {
        available_only: true,
        year_from: Some(1950),
        ..SearchFilters::new("dune")
    };

    let books = gateway.search(&filters).await.unwrap();
    let sent = &books[0].title;
    assert!(sent.contains("query=dune"));
    assert!(sent.contains("availableOnly=true"));
    assert!(sent.contains("yearFrom=1950"));
    assert!(!sent.contains("yearTo"));
    assert!(sent.contains("sortBy=title"));
}

#[tokio::test]
async fn test_wishlist_round_trip() {
    let gateway = gateway().await;

    assert_eq!(gateway.add("LIB-0001").await.unwrap(), "Added LIB-0001");
    assert_eq!(gateway.remove("LIB-0001").await.unwrap(), "ok");

    let items = gateway.list().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id.as_deref(), Some("7"));
    assert_eq!(items[0].book.barcode.as_deref(), Some("LIB-0001"));

    let err = gateway.add("LIB-MISSING").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Book not found");
}

#[tokio::test]
async fn test_connection_refused_is_a_network_error() {
    let gateway = HttpGateway::new(&ClientConfig::new("http://127.0.0.1:9/api")).unwrap();

    let err = gateway.fetch_available().await.unwrap_err();
    assert!(matches!(err, SourceError::Network(_)));
}

#[tokio::test]
async fn test_aggregator_over_http_fills_null_section() {
    let gateway = Arc::new(gateway().await);
    let aggregator = FeedAggregator::new(gateway, SessionFeedCache::in_memory(), FeedConfig::default());

    let resolution = aggregator.resolve_feed("discover").await;
    let ids: Vec<_> = resolution
        .payload
        .books("newArrivals")
        .iter()
        .filter_map(|b| b.id.as_deref())
        .collect();
    assert_eq!(ids, vec!["2", "3"]);
    assert_eq!(resolution.payload.books("trending").len(), 3);
    assert!(matches!(resolution.source, PayloadSource::Filled { .. }));
}
