//! Wishlist handlers

use super::upstream_error;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use libris_core::{LibraryEvent, WishlistAction, WishlistItem};
use serde::Serialize;

/// Confirmation from the service
#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub barcode: String,
    pub message: String,
}

/// List the wishlist
pub async fn list_wishlist(
    State(state): State<AppState>,
) -> Result<Json<Vec<WishlistItem>>, (StatusCode, String)> {
    let items = state.wishlist.list().await.map_err(upstream_error)?;
    Ok(Json(items))
}

/// Add a book by barcode
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<Json<WishlistResponse>, (StatusCode, String)> {
    let message = state.wishlist.add(&barcode).await.map_err(upstream_error)?;
    Ok(Json(changed(&state, barcode, WishlistAction::Added, message)))
}

/// Remove a book by barcode
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<Json<WishlistResponse>, (StatusCode, String)> {
    let message = state.wishlist.remove(&barcode).await.map_err(upstream_error)?;
    Ok(Json(changed(&state, barcode, WishlistAction::Removed, message)))
}

fn changed(
    state: &AppState,
    barcode: String,
    action: WishlistAction,
    message: String,
) -> WishlistResponse {
    tracing::info!(barcode = %barcode, ?action, "Wishlist changed");
    state.broadcast(LibraryEvent::WishlistChanged {
        barcode: barcode.clone(),
        action,
    });
    WishlistResponse { barcode, message }
}
