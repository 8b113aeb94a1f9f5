//! CLI command implementations

mod cached;
mod feed;
mod search;
mod session;
mod wishlist;

pub use cached::cached;
pub use feed::feed;
pub use search::search;
pub use session::{session_end, session_list};
pub use wishlist::{wishlist_add, wishlist_list, wishlist_remove};

use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use libris_core::cache::LocalBackend;
use libris_core::gateway::HttpGateway;
use libris_core::{BookSummary, ClientConfig, FeedAggregator, FeedConfig, SessionFeedCache};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Session directory used when none is given
const DEFAULT_SESSION_DIR: &str = "libris-session";

/// Settings shared by every command
pub struct Context {
    client: ClientConfig,
    feeds: FeedConfig,
    session_dir: PathBuf,
}

impl Context {
    pub fn new(api_base: String, token: Option<String>, session_dir: Option<PathBuf>) -> Result<Self> {
        let mut client = ClientConfig::new(api_base);
        client.token = token.filter(|t| !t.trim().is_empty());
        client.validate().context("Invalid --api-base")?;

        let feeds = FeedConfig::from_env().context("Invalid feed limits")?;
        let session_dir =
            session_dir.unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_SESSION_DIR));
        tracing::debug!(api_base = %client.api_base, session_dir = %session_dir.display(), "Using session");

        Ok(Self {
            client,
            feeds,
            session_dir,
        })
    }

    pub fn cache(&self) -> SessionFeedCache {
        SessionFeedCache::new(Arc::new(LocalBackend::new(&self.session_dir)))
    }

    pub fn gateway(&self) -> Result<HttpGateway> {
        HttpGateway::with_feeds(&self.client, &self.feeds).context("Failed to create HTTP client")
    }

    pub fn aggregator(&self) -> Result<FeedAggregator> {
        Ok(FeedAggregator::new(
            Arc::new(self.gateway()?),
            self.cache(),
            self.feeds.clone(),
        ))
    }

    pub fn feeds(&self) -> &FeedConfig {
        &self.feeds
    }
}

/// Spinner on stderr while the service is queried
fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// One-line rendering of a book
fn describe(book: &BookSummary) -> String {
    let mut line = book.title.clone();
    if !book.author.is_empty() {
        line.push_str(&format!(" by {}", book.author));
    }
    if let Some(year) = book.publication_year {
        line.push_str(&format!(" ({})", year));
    }
    if let Some(barcode) = &book.barcode {
        line.push_str(&format!(" [{}]", barcode));
    }
    if book.is_available() {
        line.push_str(" - available");
    }
    line
}

fn print_books(books: &[BookSummary], indent: &str) {
    for (i, book) in books.iter().enumerate() {
        println!("{}{:>2}. {}", indent, i + 1, describe(book));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_core::BookStatus;

    #[test]
    fn test_describe_full_book() {
        let book = BookSummary::new("Dune")
            .with_author("Frank Herbert")
            .with_year(1965)
            .with_barcode("LIB-0001")
            .with_status(BookStatus::Available);
        assert_eq!(
            describe(&book),
            "Dune by Frank Herbert (1965) [LIB-0001] - available"
        );
    }

    #[test]
    fn test_describe_bare_book() {
        assert_eq!(describe(&BookSummary::new("Untitled")), "Untitled");
    }

    #[test]
    fn test_context_rejects_bad_api_base() {
        assert!(Context::new("ftp://example.org".into(), None, None).is_err());
    }
}
