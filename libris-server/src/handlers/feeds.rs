//! Feed handlers

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use libris_core::{CacheEntry, FeedLimits, FeedResolution, LibraryEvent};
use serde::Deserialize;

/// Per-request overrides of the configured limits
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub desired_min: Option<usize>,
    pub cap: Option<usize>,
}

impl FeedQuery {
    fn limits(&self, defaults: FeedLimits) -> FeedLimits {
        FeedLimits {
            desired_min: self.desired_min.unwrap_or(defaults.desired_min),
            cap: self.cap.unwrap_or(defaults.cap),
        }
    }
}

/// Resolve a feed
///
/// Upstream failures never fail the request; a degraded payload carries
/// `soft_error` instead. Resolution keeps running if the client goes away.
pub async fn get_feed(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResolution>, (StatusCode, String)> {
    // Only catalogue feeds are resolved; anything else would pin a cache entry
    if state.aggregator.config().feed(&name).is_none() {
        return Err((StatusCode::NOT_FOUND, format!("Unknown feed '{}'", name)));
    }

    let limits = query.limits(state.aggregator.config().limits);
    if limits.cap == 0 {
        return Err((StatusCode::BAD_REQUEST, "cap must be at least 1".to_string()));
    }

    // Run detached so a dropped request still completes and caches
    let aggregator = state.aggregator.clone();
    let feed = name.clone();
    let resolution = tokio::spawn(async move { aggregator.resolve_feed_with(&feed, limits).await })
        .await
        .map_err(|e| {
            tracing::error!(feed = %name, "Feed resolution task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    state.broadcast(LibraryEvent::FeedRefreshed {
        feed: name,
        books: resolution.payload.total_books(),
        degraded: resolution.is_degraded(),
    });

    Ok(Json(resolution))
}

/// Last payload resolved for a feed in this session
pub async fn get_cached_feed(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CacheEntry>, StatusCode> {
    state
        .cache()
        .read_entry(&name)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_overrides_only_what_is_given() {
        let query = FeedQuery {
            desired_min: None,
            cap: Some(20),
        };
        assert_eq!(
            query.limits(FeedLimits::default()),
            FeedLimits {
                desired_min: 8,
                cap: 20
            }
        );
        assert_eq!(FeedQuery::default().limits(FeedLimits::default()), FeedLimits::default());
    }
}
