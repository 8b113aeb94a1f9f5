//! Application state

use libris_core::gateway::HttpGateway;
use libris_core::{
    ClientConfig, EventBus, FeedAggregator, FeedConfig, LibraryEvent, SessionFeedCache,
    SourceGateway, WishlistService,
};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Feed resolution with write-through caching
    pub aggregator: Arc<FeedAggregator>,

    /// Upstream sources, used directly for search
    pub gateway: Arc<dyn SourceGateway>,

    /// Upstream wishlist
    pub wishlist: Arc<dyn WishlistService>,

    /// Channel for SSE events
    pub events: EventBus,
}

impl AppState {
    /// Build state around a gateway that serves both feeds and the wishlist
    ///
    /// The feed cache lives as long as the server process.
    pub fn new<G>(gateway: Arc<G>, feeds: FeedConfig) -> Self
    where
        G: SourceGateway + WishlistService + 'static,
    {
        let aggregator = FeedAggregator::new(gateway.clone(), SessionFeedCache::in_memory(), feeds);
        Self {
            aggregator: Arc::new(aggregator),
            gateway: gateway.clone(),
            wishlist: gateway,
            events: EventBus::default(),
        }
    }

    /// Create state talking to the service configured in `LIBRIS_*`
    pub fn from_env() -> libris_core::Result<Self> {
        let client = ClientConfig::from_env()?;
        let feeds = FeedConfig::from_env()?;

        tracing::info!(api_base = %client.api_base, feeds = feeds.feeds.len(), "Using library service");
        let gateway = HttpGateway::with_feeds(&client, &feeds)?;
        Ok(Self::new(Arc::new(gateway), feeds))
    }

    pub fn cache(&self) -> &SessionFeedCache {
        self.aggregator.cache()
    }

    /// Subscribe to server events
    pub fn subscribe(&self) -> broadcast::Receiver<LibraryEvent> {
        self.events.subscribe()
    }

    /// Broadcast an event
    pub fn broadcast(&self, event: LibraryEvent) {
        let receivers = self.events.publish(event);
        tracing::trace!(receivers, "Event broadcast");
    }
}
