//! Request handlers

mod feeds;
mod search;
mod sync;
mod wishlist;

pub use feeds::*;
pub use search::*;
pub use sync::*;
pub use wishlist::*;

use axum::http::StatusCode;
use axum::Json;
use libris_core::SourceError;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Map an upstream failure to 502 carrying its message
fn upstream_error(err: SourceError) -> (StatusCode, String) {
    tracing::warn!(status = ?err.status(), "Upstream request failed: {}", err);
    (StatusCode::BAD_GATEWAY, err.to_string())
}
