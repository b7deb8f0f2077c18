//! REST collaborator abstraction
//!
//! Pages talk to the backend through [`CatalogApi`]. `folio-client` provides the HTTP
//! implementation; [`MemoryCatalog`] serves fixed data for tests and demos.

mod memory;

pub use memory::MemoryCatalog;

use crate::error::ApiError;
use crate::types::{
    Ack, BookRecord, BorrowReceipt, BorrowRecord, BorrowRequest, CategorySummary, HomeFeed,
    Profile, ProfileDetails, ProfileUpdate, Purchase, Registration, UserProfile, UserStats,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for collaborator calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Backend orderings accepted by the book list endpoint
pub const ORDER_FIELDS: [&str; 4] = ["name", "price", "date", "available_copy"];

/// Query parameters of the book list endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl BookQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn category(mut self, category: i64) -> Self {
        self.category = Some(category);
        self
    }
}

/// Logical operations of the library backend
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// List books, first page of `query.limit` entries
    async fn list_books(&self, query: &BookQuery) -> ApiResult<Vec<BookRecord>>;

    /// Fetch a single book
    async fn get_book(&self, id: i64) -> ApiResult<BookRecord>;

    async fn list_categories(&self) -> ApiResult<Vec<CategorySummary>>;

    /// Books of one category
    async fn category_books(&self, id: i64, query: &BookQuery) -> ApiResult<Vec<BookRecord>>;

    /// Landing page sections
    async fn home_feed(&self) -> ApiResult<HomeFeed>;

    /// Sign in with a username or email
    async fn login(&self, username: &str, password: &str) -> ApiResult<UserProfile>;

    async fn register(&self, registration: &Registration) -> ApiResult<Ack>;

    async fn logout(&self) -> ApiResult<Ack>;

    /// The signed-in user
    async fn me(&self) -> ApiResult<UserProfile>;

    async fn profile(&self) -> ApiResult<ProfileDetails>;

    async fn user_stats(&self) -> ApiResult<UserStats>;

    /// Unreturned borrows of the signed-in user, newest first
    async fn my_active_borrows(&self) -> ApiResult<Vec<BorrowRecord>>;

    /// Borrow a copy until `request.return_date`
    async fn borrow(&self, request: &BorrowRequest) -> ApiResult<BorrowReceipt>;

    /// Give back a borrowed copy; late returns add a warning to the profile
    async fn return_borrow(&self, borrow_id: i64) -> ApiResult<BorrowReceipt>;

    /// Buy a copy of a book that is for sale
    async fn purchase(&self, book_id: i64) -> ApiResult<Purchase>;

    /// Change the address or phone of the signed-in user's profile
    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Profile>;
}
