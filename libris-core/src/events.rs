//! Best-effort, same-process notifications between views
//!
//! The aggregator never publishes; views announce what they did (a feed
//! was rendered, the wishlist changed) and any number of subscribers react.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default channel capacity; slow subscribers skip what they missed
pub const DEFAULT_CAPACITY: usize = 100;

/// What happened to a wishlist entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WishlistAction {
    Added,
    Removed,
}

/// Cross-view notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LibraryEvent {
    /// A feed finished resolving
    FeedRefreshed {
        feed: String,
        books: usize,
        degraded: bool,
    },

    /// A book was added to or removed from the wishlist
    WishlistChanged {
        barcode: String,
        action: WishlistAction,
    },
}

impl LibraryEvent {
    /// Event name as used on the wire (SSE `event:` field)
    pub fn name(&self) -> &'static str {
        match self {
            LibraryEvent::FeedRefreshed { .. } => "feed_refreshed",
            LibraryEvent::WishlistChanged { .. } => "wishlist_changed",
        }
    }
}

/// Publish/subscribe channel for [`LibraryEvent`]s
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LibraryEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LibraryEvent> {
        self.tx.subscribe()
    }

    /// Announce an event; returns how many subscribers will see it
    pub fn publish(&self, event: LibraryEvent) -> usize {
        // No subscribers is fine
        self.tx.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
