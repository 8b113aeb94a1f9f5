//! API routes

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Origins allowed when `LIBRIS_CORS_ORIGINS` is unset
const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(std::env::var("LIBRIS_CORS_ORIGINS").ok().as_deref());

    let api_routes = Router::new()
        // Feeds
        .route("/feeds/:name", get(handlers::get_feed))
        .route("/feeds/:name/cached", get(handlers::get_cached_feed))
        // Catalogue search
        .route("/search", get(handlers::search_books))
        // Wishlist
        .route("/wishlist", get(handlers::list_wishlist))
        .route(
            "/wishlist/:barcode",
            post(handlers::add_to_wishlist).delete(handlers::remove_from_wishlist),
        )
        // SSE endpoint
        .route("/sync", get(handlers::sync_events));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// CORS policy: a comma-separated origin list, `*` for any, or local dev origins
fn cors_layer(origins: Option<&str>) -> CorsLayer {
    let allow_origin = match origins {
        Some("*") => AllowOrigin::any(),
        Some(origins) => AllowOrigin::list(parse_origins(origins.split(','))),
        None => AllowOrigin::list(parse_origins(DEV_ORIGINS)),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn parse_origins<'a>(origins: impl IntoIterator<Item = &'a str>) -> Vec<HeaderValue> {
    origins
        .into_iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}
