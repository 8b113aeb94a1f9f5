//! Search filters shared by every gateway

use crate::types::BookSummary;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Field to sort search results by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Title,
    Author,
    Year,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Title => "title",
            SortBy::Author => "author",
            SortBy::Year => "year",
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "title" => Ok(SortBy::Title),
            "author" => Ok(SortBy::Author),
            "year" => Ok(SortBy::Year),
            other => Err(format!("unknown sort field '{}' (title, author, year)", other)),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}' (asc, desc)", other)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalogue search with optional filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Free text matched against title, author and ISBN
    pub query: String,

    pub available_only: bool,

    pub year_from: Option<i32>,

    pub year_to: Option<i32>,

    pub sort_by: SortBy,

    pub order: SortOrder,
}

impl SearchFilters {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Query-string pairs in the service's parameter names
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("query", self.query.clone()),
            ("availableOnly", self.available_only.to_string()),
        ];
        if let Some(year) = self.year_from {
            pairs.push(("yearFrom", year.to_string()));
        }
        if let Some(year) = self.year_to {
            pairs.push(("yearTo", year.to_string()));
        }
        pairs.push(("sortBy", self.sort_by.as_str().to_string()));
        pairs.push(("order", self.order.as_str().to_string()));
        pairs
    }

    /// Whether a single book passes the filters (the query is not checked)
    pub fn matches(&self, book: &BookSummary) -> bool {
        if self.available_only && !book.is_available() {
            return false;
        }
        if self.year_from.is_some() || self.year_to.is_some() {
            let Some(year) = book.publication_year else {
                return false;
            };
            if self.year_from.is_some_and(|from| year < from)
                || self.year_to.is_some_and(|to| year > to)
            {
                return false;
            }
        }
        true
    }

    /// Filter and sort a result list locally
    ///
    /// The sort is stable; books without a year always sort last by year.
    pub fn apply(&self, books: Vec<BookSummary>) -> Vec<BookSummary> {
        let mut books: Vec<BookSummary> = books.into_iter().filter(|b| self.matches(b)).collect();
        books.sort_by(|a, b| self.compare(a, b));
        books
    }

    fn compare(&self, a: &BookSummary, b: &BookSummary) -> Ordering {
        match self.sort_by {
            SortBy::Title => self.order.apply(compare_text(&a.title, &b.title)),
            SortBy::Author => self.order.apply(compare_text(&a.author, &b.author)),
            SortBy::Year => match (a.publication_year, b.publication_year) {
                (Some(x), Some(y)) => self.order.apply(x.cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Case-insensitive match of `term` against title, author and ISBN
pub(crate) fn matches_term(book: &BookSummary, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    book.title.to_lowercase().contains(&term)
        || book.author.to_lowercase().contains(&term)
        || book
            .isbn
            .as_deref()
            .is_some_and(|isbn| isbn.to_lowercase().contains(&term))
}
