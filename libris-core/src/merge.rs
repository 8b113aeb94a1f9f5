//! De-duplicating, length-capped merge of book lists

use crate::types::BookSummary;
use std::collections::HashSet;

/// Merge `base` then `extra` into at most `cap` books
///
/// Keeps the first occurrence of each identity key in input order. Books
/// without any identifier are dropped.
pub fn merge(base: &[BookSummary], extra: &[BookSummary], cap: usize) -> Vec<BookSummary> {
    merge_all([base, extra], cap)
}

/// Merge any number of lists, earlier lists taking precedence
pub fn merge_all<'a, I>(lists: I, cap: usize) -> Vec<BookSummary>
where
    I: IntoIterator<Item = &'a [BookSummary]>,
{
    let mut merged = Vec::new();
    if cap == 0 {
        return merged;
    }

    let mut seen = HashSet::new();
    for book in lists.into_iter().flatten() {
        let Some(key) = book.identity_key() else {
            continue;
        };
        if seen.insert(key) {
            merged.push(book.clone());
            if merged.len() == cap {
                break;
            }
        }
    }
    merged
}
