//! Home feed returned by the landing endpoint

use super::BookRecord;
use crate::catalog::dedupe_by_id;
use serde::{Deserialize, Serialize};

/// Number of books rotated in the landing hero
pub const HERO_ITEM_LIMIT: usize = 5;

/// Everything the landing page shows
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HomeFeed {
    #[serde(default)]
    pub categories: Vec<CategorySummary>,
    #[serde(default)]
    pub new_books: Vec<BookRecord>,
    #[serde(default)]
    pub popular_books: Vec<BookRecord>,
    #[serde(default)]
    pub special_books: Vec<BookRecord>,
    /// Books the signed-in user is still reading
    #[serde(default)]
    pub previous_reading: Vec<BookRecord>,
    #[serde(default)]
    pub authors: Vec<AuthorSummary>,
    #[serde(default)]
    pub banners: Vec<Banner>,
}

/// Category with its book count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: i64,
    pub name: String,
}

/// Promotional banner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Banner {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub image_url: String,
}

impl HomeFeed {
    /// Books for the rotating hero: special, then popular, then new, first five distinct ids
    pub fn hero_items(&self) -> Vec<BookRecord> {
        let combined: Vec<BookRecord> = self
            .special_books
            .iter()
            .chain(&self.popular_books)
            .chain(&self.new_books)
            .cloned()
            .collect();

        let mut items = dedupe_by_id(combined);
        items.truncate(HERO_ITEM_LIMIT);
        items
    }
}
