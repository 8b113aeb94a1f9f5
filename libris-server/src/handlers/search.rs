//! Catalogue search handler

use super::upstream_error;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use libris_core::{BookSummary, SearchFilters};
use serde::Serialize;

/// Search results
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub books: Vec<BookSummary>,
    pub total: usize,
}

/// Search the catalogue with optional filters
pub async fn search_books(
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    tracing::debug!(query = %filters.query, "Searching catalogue");
    let books = state.gateway.search(&filters).await.map_err(upstream_error)?;

    Ok(Json(SearchResponse {
        total: books.len(),
        books,
    }))
}
