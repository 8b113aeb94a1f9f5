//! Book summaries as served by the library service

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A catalogue entry as it appears in feeds and search results
///
/// Every field is optional on the wire; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    /// Service-side identifier (numeric upstream, kept as text)
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    /// Physical copy barcode
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub barcode: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub isbn: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookStatus>,

    /// Legacy availability flag, consulted only when `status` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_copies: Option<u32>,
}

impl BookSummary {
    /// Create a summary with just a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.publication_year = Some(year);
        self
    }

    pub fn with_status(mut self, status: BookStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_copies(mut self, copies: u32) -> Self {
        self.available_copies = Some(copies);
        self
    }

    /// Resolve the de-duplication key: id, then barcode, then isbn
    ///
    /// Blank values are skipped. Returns `None` when the book carries no
    /// usable identifier at all.
    pub fn identity_key(&self) -> Option<IdentityKey> {
        fn usable(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        usable(&self.id)
            .map(IdentityKey::Id)
            .or_else(|| usable(&self.barcode).map(IdentityKey::Barcode))
            .or_else(|| usable(&self.isbn).map(IdentityKey::Isbn))
    }

    /// Whether a copy can currently be borrowed
    pub fn is_available(&self) -> bool {
        match &self.status {
            Some(status) => status.is_available(),
            None => self
                .available
                .unwrap_or_else(|| self.available_copies.is_some_and(|n| n > 0)),
        }
    }
}

/// Resolved identity of a book; the variant records which field it came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityKey {
    Id(String),
    Barcode(String),
    Isbn(String),
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Id(v) => write!(f, "id:{}", v),
            IdentityKey::Barcode(v) => write!(f, "barcode:{}", v),
            IdentityKey::Isbn(v) => write!(f, "isbn:{}", v),
        }
    }
}

/// Circulation status reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookStatus {
    Available,
    Unavailable,
    Issued,
    Reserved,
    Lost,
    /// Any status this client does not know about
    Other(String),
}

impl BookStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, BookStatus::Available)
    }

    pub fn as_str(&self) -> &str {
        match self {
            BookStatus::Available => "AVAILABLE",
            BookStatus::Unavailable => "UNAVAILABLE",
            BookStatus::Issued => "ISSUED",
            BookStatus::Reserved => "RESERVED",
            BookStatus::Lost => "LOST",
            BookStatus::Other(s) => s,
        }
    }
}

impl From<String> for BookStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => BookStatus::Available,
            "UNAVAILABLE" => BookStatus::Unavailable,
            "ISSUED" => BookStatus::Issued,
            "RESERVED" => BookStatus::Reserved,
            "LOST" => BookStatus::Lost,
            _ => BookStatus::Other(value),
        }
    }
}

impl From<BookStatus> for String {
    fn from(status: BookStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the signed-in user's wishlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    pub book: BookSummary,
}

/// Identifiers arrive as JSON numbers or strings; keep them as text
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}
