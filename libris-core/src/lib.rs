//! Libris Core Library
//!
//! This crate provides the resilient feed logic behind the Libris discover and
//! search views. Recommendation feeds are resolved through an ordered cascade
//! of upstream sources, merged without duplicates, and cached for the
//! browsing session so a view can repaint instantly on its next mount.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod merge;
pub mod types;

pub use aggregator::{FallbackSource, FeedAggregator, FeedResolution, PayloadSource, SoftError};
pub use cache::{CacheEntry, SessionFeedCache};
pub use config::{ClientConfig, FeedConfig, FeedDefinition, FeedLimits};
pub use error::{CacheError, ConfigError, LibrisError, Result, SourceError};
pub use events::{EventBus, LibraryEvent, WishlistAction};
pub use gateway::{SearchFilters, SourceGateway, WishlistService};
pub use merge::{merge, merge_all};
pub use types::{BookStatus, BookSummary, FeedPayload, FeedSection, IdentityKey, WishlistItem};
