//! Feed aggregation with ordered fallback
//!
//! [`FeedAggregator::resolve_feed`] always produces a payload that contains
//! every expected section, no matter how many upstream sources fail:
//!
//! 1. Fetch the primary recommendation feed.
//! 2. Sections shorter than `desired_min` are topped up from a fallback
//!    pool: the available books, or failing that an unfiltered search.
//! 3. If the primary feed itself fails, every section is rebuilt from the
//!    same fallback pool.
//! 4. The result is written to the session cache before it is returned.
//!
//! Upstream failures never escape. When the payload is degraded the
//! resolution carries a [`SoftError`] the caller can show as an advisory.

use crate::cache::SessionFeedCache;
use crate::config::{FeedConfig, FeedLimits};
use crate::error::SourceError;
use crate::gateway::SourceGateway;
use crate::merge::merge;
use crate::types::{BookSummary, FeedPayload};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Recovered failure reported next to a best-effort payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SoftError {
    /// Sources failed; the payload could not be fully refreshed
    Unavailable { message: String },

    /// Every source answered, but none had anything to show
    NoData,
}

impl SoftError {
    /// Advisory text for the user
    pub fn advisory(&self) -> String {
        match self {
            SoftError::Unavailable { message } => {
                format!("Could not fully refresh recommendations: {}", message)
            }
            SoftError::NoData => "No recommendations are available right now.".to_string(),
        }
    }
}

/// Fallback source that supplied books
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackSource {
    Available,
    Search,
}

/// Which path produced a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayloadSource {
    /// The primary feed, as served (short sections merged with nothing new)
    Primary,

    /// The primary feed with short sections topped up
    Filled { from: FallbackSource },

    /// The primary feed failed; sections were rebuilt from a fallback
    Recovered { from: FallbackSource },

    /// Nothing could be fetched; every section is empty
    Empty,
}

/// Outcome of one aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedResolution {
    pub feed: String,
    pub payload: FeedPayload,
    pub source: PayloadSource,
    pub soft_error: Option<SoftError>,
}

impl FeedResolution {
    fn new(
        feed: &str,
        payload: FeedPayload,
        source: PayloadSource,
        soft_error: Option<SoftError>,
    ) -> Self {
        Self {
            feed: feed.to_string(),
            payload,
            source,
            soft_error,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.soft_error.is_some()
    }
}

/// Result of walking the fallback cascade
enum FallbackPool {
    Books {
        from: FallbackSource,
        books: Vec<BookSummary>,
    },
    Empty,
    Failed(SourceError),
}

/// Resolves feeds against a gateway and writes them through to the cache
pub struct FeedAggregator {
    gateway: Arc<dyn SourceGateway>,
    cache: SessionFeedCache,
    config: FeedConfig,
}

impl FeedAggregator {
    pub fn new(gateway: Arc<dyn SourceGateway>, cache: SessionFeedCache, config: FeedConfig) -> Self {
        Self {
            gateway,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &SessionFeedCache {
        &self.cache
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Resolve `feed_name` with the configured limits
    pub async fn resolve_feed(&self, feed_name: &str) -> FeedResolution {
        self.resolve_feed_with(feed_name, self.config.limits).await
    }

    /// Resolve `feed_name` with explicit limits
    ///
    /// Always recomputes from the sources and always writes the result to
    /// the session cache.
    pub async fn resolve_feed_with(&self, feed_name: &str, limits: FeedLimits) -> FeedResolution {
        let expected = self.config.sections_for(feed_name);

        let resolution = match self.gateway.fetch_recommendations(feed_name).await {
            Ok(mut payload) => {
                payload.ensure_sections(expected);
                self.fill_gaps(feed_name, payload, limits).await
            }
            Err(e) => {
                tracing::warn!(feed = feed_name, source = "recommendations", "Primary source failed: {}", e);
                self.recover(feed_name, expected, limits, e).await
            }
        };

        if let Err(e) = self.cache.write(feed_name, &resolution.payload) {
            tracing::warn!(feed = feed_name, "Failed to cache feed: {}", e);
        }

        tracing::debug!(
            feed = feed_name,
            source = ?resolution.source,
            books = resolution.payload.total_books(),
            degraded = resolution.is_degraded(),
            "Feed resolved"
        );
        resolution
    }

    async fn fill_gaps(
        &self,
        feed_name: &str,
        mut payload: FeedPayload,
        limits: FeedLimits,
    ) -> FeedResolution {
        let short: Vec<String> = payload
            .sections()
            .filter(|s| s.len() < limits.desired_min)
            .map(|s| s.name.clone())
            .collect();

        if short.is_empty() {
            tracing::debug!(feed = feed_name, "All sections meet the desired minimum");
            return FeedResolution::new(feed_name, payload, PayloadSource::Primary, None);
        }

        tracing::debug!(feed = feed_name, sections = ?short, "Sections need fill");
        let (pool, source, soft_error) = match self.fallback_pool(feed_name).await {
            FallbackPool::Books { from, books } => (books, PayloadSource::Filled { from }, None),
            FallbackPool::Empty => (Vec::new(), PayloadSource::Primary, None),
            FallbackPool::Failed(e) => (
                Vec::new(),
                PayloadSource::Primary,
                Some(SoftError::Unavailable {
                    message: e.to_string(),
                }),
            ),
        };

        for name in &short {
            if let Some(section) = payload.section_mut(name) {
                section.books = merge(&section.books, &pool, limits.cap);
            }
        }

        FeedResolution::new(feed_name, payload, source, soft_error)
    }

    async fn recover(
        &self,
        feed_name: &str,
        expected: &[String],
        limits: FeedLimits,
        primary_error: SourceError,
    ) -> FeedResolution {
        let mut payload = FeedPayload::empty_sections(expected);

        // No known sections means there is nothing a fallback could fill
        if expected.is_empty() {
            return FeedResolution::new(
                feed_name,
                payload,
                PayloadSource::Empty,
                Some(SoftError::Unavailable {
                    message: primary_error.to_string(),
                }),
            );
        }

        match self.fallback_pool(feed_name).await {
            FallbackPool::Books { from, books } => {
                let head: Vec<BookSummary> = books.into_iter().take(limits.cap).collect();
                for section in payload.sections_mut() {
                    section.books = head.clone();
                }
                FeedResolution::new(feed_name, payload, PayloadSource::Recovered { from }, None)
            }
            FallbackPool::Empty => FeedResolution::new(
                feed_name,
                payload,
                PayloadSource::Empty,
                Some(SoftError::NoData),
            ),
            FallbackPool::Failed(e) => FeedResolution::new(
                feed_name,
                payload,
                PayloadSource::Empty,
                Some(SoftError::Unavailable {
                    message: e.to_string(),
                }),
            ),
        }
    }

    /// Available books, else an unfiltered search
    async fn fallback_pool(&self, feed_name: &str) -> FallbackPool {
        match self.gateway.fetch_available().await {
            Ok(books) if !books.is_empty() => {
                return FallbackPool::Books {
                    from: FallbackSource::Available,
                    books,
                }
            }
            Ok(_) => {
                tracing::info!(feed = feed_name, source = "available", "Source returned no items");
            }
            Err(e) => {
                tracing::warn!(feed = feed_name, source = "available", "Fallback source failed: {}", e);
            }
        }

        match self.gateway.fetch_by_search("").await {
            Ok(books) if !books.is_empty() => FallbackPool::Books {
                from: FallbackSource::Search,
                books,
            },
            Ok(_) => {
                tracing::info!(feed = feed_name, source = "search", "Source returned no items");
                FallbackPool::Empty
            }
            Err(e) => {
                tracing::warn!(feed = feed_name, source = "search", "Fallback source failed: {}", e);
                FallbackPool::Failed(e)
            }
        }
    }
}
