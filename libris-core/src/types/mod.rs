//! Core data types shared by the gateway, cache, and aggregator

mod book;
mod feed;

pub use book::{BookStatus, BookSummary, IdentityKey, WishlistItem};
pub use feed::{FeedPayload, FeedSection};
