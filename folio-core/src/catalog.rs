//! Catalog query engine
//!
//! Turns the raw book collection fetched from the backend into the derived view shown to the
//! user. The engine is a pure function of the raw collection and the current [`QueryState`]:
//! it never mutates or reorders its input, so switching sort keys back and forth over the same
//! raw collection always yields the same views.

use crate::types::BookRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Sort order for the derived view
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Backend order, no reordering
    #[default]
    Featured,
    /// Most recent publication date first
    Newest,
    /// Cheapest first
    PriceLow,
    /// Most expensive first
    PriceHigh,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Featured,
        SortKey::Newest,
        SortKey::PriceLow,
        SortKey::PriceHigh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Featured => "featured",
            SortKey::Newest => "newest",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "featured" => Ok(SortKey::Featured),
            "newest" => Ok(SortKey::Newest),
            "price-low" | "pricelow" | "price_low" => Ok(SortKey::PriceLow),
            "price-high" | "pricehigh" | "price_high" => Ok(SortKey::PriceHigh),
            other => Err(format!(
                "unknown sort key '{}' (expected featured, newest, price-low or price-high)",
                other
            )),
        }
    }
}

/// User-controlled query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryState {
    pub search_text: String,
    pub sort_key: SortKey,
}

impl QueryState {
    pub fn new(search_text: impl Into<String>, sort_key: SortKey) -> Self {
        Self {
            search_text: search_text.into(),
            sort_key,
        }
    }

    /// Normalized search needle, `None` when the filter is a no-op
    fn needle(&self) -> Option<String> {
        let trimmed = self.search_text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }
}

/// Compute the derived view for `raw` under `query`
pub fn compute_view<'a>(raw: &'a [BookRecord], query: &QueryState) -> Vec<&'a BookRecord> {
    let mut view: Vec<&BookRecord> = match query.needle() {
        Some(needle) => raw.iter().filter(|b| matches_search(b, &needle)).collect(),
        None => raw.iter().collect(),
    };

    // `sort_by` is stable, ties keep the filtered order
    match query.sort_key {
        SortKey::Featured => {}
        SortKey::Newest => {
            view.sort_by(|a, b| missing_last(a.published_at(), b.published_at(), |x, y| y.cmp(&x)))
        }
        SortKey::PriceLow => {
            view.sort_by(|a, b| missing_last(price_of(a), price_of(b), |x, y| x.total_cmp(&y)))
        }
        SortKey::PriceHigh => {
            view.sort_by(|a, b| missing_last(price_of(a), price_of(b), |x, y| y.total_cmp(&x)))
        }
    }

    view
}

/// Drop records whose id was already seen, keeping the first occurrence
pub fn dedupe_by_id(books: Vec<BookRecord>) -> Vec<BookRecord> {
    let mut seen = HashSet::with_capacity(books.len());
    books
        .into_iter()
        .filter(|book| {
            let fresh = seen.insert(book.id);
            if !fresh {
                tracing::warn!("Dropping duplicate book id {} ('{}')", book.id, book.name);
            }
            fresh
        })
        .collect()
}

fn matches_search(book: &BookRecord, needle: &str) -> bool {
    book.name.to_lowercase().contains(needle)
        || book
            .author
            .as_deref()
            .map(|a| a.to_lowercase().contains(needle))
            .unwrap_or(false)
}

fn price_of(book: &BookRecord) -> Option<f64> {
    book.price.filter(|p| !p.is_nan())
}

/// Order present values with `cmp`, absent values after all present ones
fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
