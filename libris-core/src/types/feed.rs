//! Feed payloads: named, ordered sections of book summaries

use super::BookSummary;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One ordered list of books within a feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSection {
    pub name: String,
    pub books: Vec<BookSummary>,
}

impl FeedSection {
    pub fn new(name: impl Into<String>, books: Vec<BookSummary>) -> Self {
        Self {
            name: name.into(),
            books,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// A feed: section name to section, in declaration order
///
/// Serializes as a JSON object (`{"trending": [...], "newArrivals": [...]}`),
/// the same shape the service puts under `data`. A `null` section
/// deserializes as an empty one, so a section key is never "undefined".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedPayload {
    sections: Vec<FeedSection>,
}

impl FeedPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// A payload holding one empty section per name
    pub fn empty_sections<S: AsRef<str>>(names: &[S]) -> Self {
        let mut payload = Self::new();
        payload.ensure_sections(names);
        payload
    }

    /// Builder-style insert
    pub fn with_section(mut self, name: impl Into<String>, books: Vec<BookSummary>) -> Self {
        self.insert(name, books);
        self
    }

    /// Insert or replace a section, keeping the position of an existing one
    pub fn insert(&mut self, name: impl Into<String>, books: Vec<BookSummary>) {
        let name = name.into();
        match self.section_mut(&name) {
            Some(section) => section.books = books,
            None => self.sections.push(FeedSection::new(name, books)),
        }
    }

    /// Append an empty section for every name not already present
    pub fn ensure_sections<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            if self.section(name).is_none() {
                self.sections.push(FeedSection::empty(name));
            }
        }
    }

    pub fn section(&self, name: &str) -> Option<&FeedSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut FeedSection> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Books of a section; an unknown section reads as empty
    pub fn books(&self, name: &str) -> &[BookSummary] {
        self.section(name).map(|s| s.books.as_slice()).unwrap_or(&[])
    }

    pub fn sections(&self) -> impl Iterator<Item = &FeedSection> {
        self.sections.iter()
    }

    pub fn sections_mut(&mut self) -> impl Iterator<Item = &mut FeedSection> {
        self.sections.iter_mut()
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of books across all sections
    pub fn total_books(&self) -> usize {
        self.sections.iter().map(FeedSection::len).sum()
    }
}

impl Serialize for FeedPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.name, &section.books)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeedPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PayloadVisitor;

        impl<'de> Visitor<'de> for PayloadVisitor {
            type Value = FeedPayload;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of section names to book lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FeedPayload, A::Error> {
                let mut payload = FeedPayload::new();
                while let Some((name, books)) =
                    access.next_entry::<String, Option<Vec<BookSummary>>>()?
                {
                    payload.insert(name, books.unwrap_or_default());
                }
                Ok(payload)
            }
        }

        deserializer.deserialize_map(PayloadVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_order_survives_serialization() {
        let payload = FeedPayload::new()
            .with_section("trending", vec![BookSummary::new("A").with_id("1")])
            .with_section("newArrivals", vec![]);

        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"trending":[{"id":"1","title":"A","author":""}],"newArrivals":[]}"#);

        let back: FeedPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back.section_names(), vec!["trending", "newArrivals"]);
    }

    #[test]
    fn test_null_section_reads_as_empty() {
        let payload: FeedPayload =
            serde_json::from_str(r#"{"newArrivals": null, "trending": []}"#).unwrap();
        assert_eq!(payload.section_names(), vec!["newArrivals", "trending"]);
        assert!(payload.books("newArrivals").is_empty());
    }

    #[test]
    fn test_ensure_sections_keeps_existing_data() {
        let mut payload =
            FeedPayload::new().with_section("trending", vec![BookSummary::new("A").with_id("1")]);
        payload.ensure_sections(&["trending", "newArrivals"]);

        assert_eq!(payload.section_names(), vec!["trending", "newArrivals"]);
        assert_eq!(payload.books("trending").len(), 1);
        assert_eq!(payload.total_books(), 1);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut payload = FeedPayload::empty_sections(&["a", "b"]);
        payload.insert("a", vec![BookSummary::new("X").with_id("x")]);
        assert_eq!(payload.section_names(), vec!["a", "b"]);
        assert_eq!(payload.books("a").len(), 1);
        assert!(payload.books("missing").is_empty());
    }
}
