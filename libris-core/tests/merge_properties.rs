//! Property tests for the book list merge
//!
//! Identifiers are drawn from a tiny alphabet so that collisions (within a
//! list, across lists, and across id/barcode/isbn) are common.

use libris_core::{merge, BookSummary, IdentityKey};
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_identifier() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        (0u8..6).prop_map(|n| Some(n.to_string())),
    ]
}

fn arb_book() -> impl Strategy<Value = BookSummary> {
    (arb_identifier(), arb_identifier(), arb_identifier(), "[a-z]{1,6}").prop_map(
        |(id, barcode, isbn, title)| BookSummary {
            id,
            barcode,
            isbn,
            title,
            ..BookSummary::default()
        },
    )
}

fn arb_books() -> impl Strategy<Value = Vec<BookSummary>> {
    prop::collection::vec(arb_book(), 0..12)
}

fn keys(books: &[BookSummary]) -> Vec<IdentityKey> {
    books.iter().filter_map(BookSummary::identity_key).collect()
}

proptest! {
    #[test]
    fn merge_is_idempotent(a in arb_books(), b in arb_books(), cap in 0usize..16) {
        let once = merge(&a, &b, cap);
        prop_assert_eq!(merge(&once, &[], cap), once);
    }

    #[test]
    fn merge_never_repeats_a_key(a in arb_books(), b in arb_books(), cap in 0usize..16) {
        let merged = merge(&a, &b, cap);
        let merged_keys = keys(&merged);
        let unique: HashSet<_> = merged_keys.iter().collect();
        prop_assert_eq!(unique.len(), merged_keys.len());
        prop_assert_eq!(merged_keys.len(), merged.len());
    }

    #[test]
    fn merge_respects_cap(a in arb_books(), b in arb_books(), cap in 0usize..16) {
        prop_assert!(merge(&a, &b, cap).len() <= cap);
    }

    #[test]
    fn merge_keeps_first_occurrences_in_order(a in arb_books(), b in arb_books(), cap in 0usize..16) {
        let mut seen = HashSet::new();
        let expected: Vec<BookSummary> = a
            .iter()
            .chain(b.iter())
            .filter(|book| book.identity_key().is_some_and(|key| seen.insert(key)))
            .take(cap)
            .cloned()
            .collect();
        prop_assert_eq!(merge(&a, &b, cap), expected);
    }

    #[test]
    fn merge_fills_up_to_cap_when_enough_unique_keys(a in arb_books(), b in arb_books(), cap in 0usize..16) {
        let mut all = a.clone();
        all.extend(b.iter().cloned());
        let unique: HashSet<_> = keys(&all).into_iter().collect();
        prop_assert_eq!(merge(&a, &b, cap).len(), unique.len().min(cap));
    }
}
