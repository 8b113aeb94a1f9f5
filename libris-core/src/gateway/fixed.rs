//! In-memory gateway with scripted responses (tests and offline demos)

use super::search::matches_term;
use super::{SourceGateway, SourceResult, WishlistService};
use crate::error::SourceError;
use crate::types::{BookSummary, FeedPayload, WishlistItem};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// How many times each source has been called
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayCalls {
    pub recommendations: usize,
    pub available: usize,
    pub search: usize,
}

/// Gateway answering from scripted results
///
/// Anything not scripted fails with [`SourceError::Scripted`].
#[derive(Default)]
pub struct FixedGateway {
    recommendations: HashMap<String, SourceResult<FeedPayload>>,
    available: Option<SourceResult<Vec<BookSummary>>>,
    search: Option<SourceResult<Vec<BookSummary>>>,
    wishlist: Mutex<Vec<BookSummary>>,
    search_terms: Mutex<Vec<String>>,
    recommendation_calls: AtomicUsize,
    available_calls: AtomicUsize,
    search_calls: AtomicUsize,
}

impl FixedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recommendations(mut self, feed_name: &str, payload: FeedPayload) -> Self {
        self.recommendations
            .insert(feed_name.to_string(), Ok(payload));
        self
    }

    pub fn failing_recommendations(mut self, feed_name: &str, message: &str) -> Self {
        self.recommendations.insert(
            feed_name.to_string(),
            Err(SourceError::Scripted(message.to_string())),
        );
        self
    }

    pub fn with_available(mut self, books: Vec<BookSummary>) -> Self {
        self.available = Some(Ok(books));
        self
    }

    pub fn failing_available(mut self, message: &str) -> Self {
        self.available = Some(Err(SourceError::Scripted(message.to_string())));
        self
    }

    /// Script the search catalogue; terms filter it by title, author and ISBN
    pub fn with_search(mut self, books: Vec<BookSummary>) -> Self {
        self.search = Some(Ok(books));
        self
    }

    pub fn failing_search(mut self, message: &str) -> Self {
        self.search = Some(Err(SourceError::Scripted(message.to_string())));
        self
    }

    pub fn calls(&self) -> GatewayCalls {
        GatewayCalls {
            recommendations: self.recommendation_calls.load(Ordering::SeqCst),
            available: self.available_calls.load(Ordering::SeqCst),
            search: self.search_calls.load(Ordering::SeqCst),
        }
    }

    /// Terms passed to `fetch_by_search`, in call order
    pub fn search_terms(&self) -> Vec<String> {
        self.search_terms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn not_scripted(source: &str) -> SourceError {
        SourceError::Scripted(format!("{} not scripted", source))
    }

    /// Every scripted book, used to resolve wishlist barcodes
    fn catalogue(&self) -> impl Iterator<Item = &BookSummary> {
        let feeds = self
            .recommendations
            .values()
            .filter_map(|r| r.as_ref().ok())
            .flat_map(|payload| payload.sections().flat_map(|s| s.books.iter()));
        let lists = [&self.available, &self.search]
            .into_iter()
            .filter_map(|r| r.as_ref().and_then(|r| r.as_ref().ok()))
            .flatten();
        feeds.chain(lists)
    }
}

#[async_trait]
impl SourceGateway for FixedGateway {
    async fn fetch_recommendations(&self, feed_name: &str) -> SourceResult<FeedPayload> {
        self.recommendation_calls.fetch_add(1, Ordering::SeqCst);
        self.recommendations
            .get(feed_name)
            .cloned()
            .unwrap_or_else(|| Err(Self::not_scripted("recommendations")))
    }

    async fn fetch_available(&self) -> SourceResult<Vec<BookSummary>> {
        self.available_calls.fetch_add(1, Ordering::SeqCst);
        self.available
            .clone()
            .unwrap_or_else(|| Err(Self::not_scripted("available")))
    }

    async fn fetch_by_search(&self, term: &str) -> SourceResult<Vec<BookSummary>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search_terms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(term.to_string());

        let books = self
            .search
            .clone()
            .unwrap_or_else(|| Err(Self::not_scripted("search")))?;
        Ok(books.into_iter().filter(|b| matches_term(b, term)).collect())
    }
}

#[async_trait]
impl WishlistService for FixedGateway {
    async fn add(&self, barcode: &str) -> SourceResult<String> {
        let book = self
            .catalogue()
            .find(|b| b.barcode.as_deref() == Some(barcode))
            .cloned()
            .ok_or_else(|| SourceError::Http {
                status: 400,
                message: "Book not found".to_string(),
            })?;

        let mut wishlist = self.wishlist.lock().unwrap_or_else(PoisonError::into_inner);
        if wishlist.iter().any(|b| b.barcode.as_deref() == Some(barcode)) {
            return Ok("Already in wishlist".to_string());
        }
        wishlist.push(book);
        Ok("Added to wishlist".to_string())
    }

    async fn remove(&self, barcode: &str) -> SourceResult<String> {
        self.wishlist
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|b| b.barcode.as_deref() != Some(barcode));
        Ok("Removed from wishlist".to_string())
    }

    async fn list(&self) -> SourceResult<Vec<WishlistItem>> {
        let wishlist = self.wishlist.lock().unwrap_or_else(PoisonError::into_inner);
        // Newest first, like the service
        Ok(wishlist
            .iter()
            .enumerate()
            .rev()
            .map(|(i, book)| WishlistItem {
                id: Some((i + 1).to_string()),
                book: book.clone(),
            })
            .collect())
    }
}
