//! The book record as returned by the backend

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book as listed by the backend
///
/// Only `id` is required. Every other field is optional on the wire so that a
/// partially populated record still renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookRecord {
    /// Stable identity, used as the rendering key
    pub id: i64,

    /// Display title
    #[serde(default)]
    pub name: String,

    /// Author display string
    #[serde(default)]
    pub author: Option<String>,

    /// Publication date (ISO-8601)
    #[serde(default)]
    pub date: Option<String>,

    /// Price in the store currency
    #[serde(default)]
    pub price: Option<f64>,

    /// Whether the book is for sale rather than borrow-only
    #[serde(default)]
    pub sell: bool,

    /// Copies currently on the shelf
    #[serde(default)]
    pub available_copy: Option<i64>,

    /// Categories, first one is shown as the badge
    #[serde(default)]
    pub category: Vec<CategoryRef>,

    /// Cover image path as stored by the backend
    #[serde(default)]
    pub cover_image: Option<String>,

    /// Absolute cover URL, when the backend already built one
    #[serde(default)]
    pub cover_image_url: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Category reference embedded in a book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

impl BookRecord {
    /// Create a record with just an id and a title
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            author: None,
            date: None,
            price: None,
            sell: false,
            available_copy: None,
            category: Vec::new(),
            cover_image: None,
            cover_image_url: None,
            description: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stock(mut self, copies: i64) -> Self {
        self.available_copy = Some(copies);
        self
    }

    /// Mark the book as purchasable
    pub fn for_sale(mut self) -> Self {
        self.sell = true;
        self
    }

    pub fn with_category(mut self, id: i64, name: impl Into<String>) -> Self {
        self.category.push(CategoryRef {
            id,
            name: name.into(),
        });
        self
    }

    /// The category shown as the badge
    pub fn primary_category(&self) -> Option<&CategoryRef> {
        self.category.first()
    }

    /// Parsed publication date, `None` when absent or unparseable
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Whether the book has copies available to borrow
    pub fn is_available(&self) -> bool {
        self.available_copy.map(|n| n > 0).unwrap_or(false)
    }
}
