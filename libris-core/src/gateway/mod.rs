//! Upstream data sources the feed can draw from
//!
//! A [`SourceGateway`] exposes three independently failable sources: the
//! primary recommendation feed, the list of currently available books, and
//! the generic catalogue search. Failures always come back as a
//! [`SourceError`]; an empty `Vec` means the source answered with nothing.

mod fixed;
mod http;
mod search;

pub use fixed::{FixedGateway, GatewayCalls};
pub use http::HttpGateway;
pub use search::{SearchFilters, SortBy, SortOrder};

use crate::error::SourceError;
use crate::types::{BookSummary, FeedPayload, WishlistItem};
use async_trait::async_trait;

/// Result type for gateway calls
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// The upstream sources behind a feed
#[async_trait]
pub trait SourceGateway: Send + Sync {
    /// Primary source: the recommendation feed called `feed_name`
    async fn fetch_recommendations(&self, feed_name: &str) -> SourceResult<FeedPayload>;

    /// Secondary source: books that can be borrowed right now
    async fn fetch_available(&self) -> SourceResult<Vec<BookSummary>>;

    /// Tertiary source: catalogue search; an empty term lists everything
    async fn fetch_by_search(&self, term: &str) -> SourceResult<Vec<BookSummary>>;

    /// Filtered, sorted catalogue search
    ///
    /// The default runs [`SourceGateway::fetch_by_search`] and filters locally.
    async fn search(&self, filters: &SearchFilters) -> SourceResult<Vec<BookSummary>> {
        let books = self.fetch_by_search(&filters.query).await?;
        Ok(filters.apply(books))
    }
}

/// The signed-in user's wishlist
#[async_trait]
pub trait WishlistService: Send + Sync {
    /// Add a book by barcode; returns the service's confirmation message
    async fn add(&self, barcode: &str) -> SourceResult<String>;

    /// Remove a book by barcode; returns the service's confirmation message
    async fn remove(&self, barcode: &str) -> SourceResult<String>;

    async fn list(&self) -> SourceResult<Vec<WishlistItem>>;
}
