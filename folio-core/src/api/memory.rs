//! In-memory backend

use super::{ApiResult, BookQuery, CatalogApi, ORDER_FIELDS};
use crate::error::ApiError;
use crate::types::{
    Ack, BookRecord, BorrowReceipt, BorrowRecord, BorrowRequest, CategorySummary, HomeFeed,
    Profile, ProfileDetails, ProfileUpdate, Purchase, Registration, UserProfile, UserStats,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Borrow limit of a profile that has none set
const DEFAULT_BORROW_LIMIT: u32 = 2;

#[derive(Debug, Clone)]
struct Account {
    user: UserProfile,
    password: String,
}

#[derive(Debug, Default)]
struct Data {
    books: Vec<BookRecord>,
    categories: Vec<CategorySummary>,
    feed: HomeFeed,
    accounts: HashMap<String, Account>,
    signed_in: Option<String>,
    profile: ProfileDetails,
    stats: UserStats,
    borrows: Vec<BorrowRecord>,
    failure: Option<ApiError>,
}

fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError::Status {
        status: 400,
        message: message.into(),
    }
}

/// In-memory [`CatalogApi`] (for testing)
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    data: RwLock<Data>,
    calls: AtomicUsize,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: Vec<BookRecord>) -> Self {
        let catalog = Self::new();
        catalog.write().books = books;
        catalog
    }

    fn read(&self) -> RwLockReadGuard<'_, Data> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Data> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_books(&self, books: Vec<BookRecord>) {
        self.write().books = books;
    }

    pub fn set_categories(&self, categories: Vec<CategorySummary>) {
        self.write().categories = categories;
    }

    pub fn set_feed(&self, feed: HomeFeed) {
        self.write().feed = feed;
    }

    pub fn set_profile(&self, profile: ProfileDetails, stats: UserStats) {
        let mut data = self.write();
        data.profile = profile;
        data.stats = stats;
    }

    /// Borrows held by every user, returned ones included
    pub fn borrows(&self) -> Vec<BorrowRecord> {
        self.read().borrows.clone()
    }

    /// Record an existing borrow, for example one that is already overdue
    pub fn add_borrow(&self, borrow: BorrowRecord) {
        self.write().borrows.push(borrow);
    }

    /// Register an account that can log in
    pub fn add_account(&self, user: UserProfile, password: impl Into<String>) {
        self.write().accounts.insert(
            user.username.clone(),
            Account {
                user,
                password: password.into(),
            },
        );
    }

    /// Make every following call fail with `error` until cleared with `None`
    pub fn fail_with(&self, error: Option<ApiError>) {
        self.write().failure = error;
    }

    /// Number of calls received, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> ApiResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.read().failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn require_user(&self) -> ApiResult<UserProfile> {
        let data = self.read();
        data.signed_in
            .as_ref()
            .and_then(|name| data.accounts.get(name))
            .map(|account| account.user.clone())
            .ok_or(ApiError::Unauthorized)
    }
}

/// Server-side filtering, ordering and pagination of the book list
fn select_books(books: &[BookRecord], query: &BookQuery) -> Vec<BookRecord> {
    let mut selected: Vec<BookRecord> = books
        .iter()
        .filter(|b| match &query.search {
            Some(search) => b.name.to_lowercase().contains(&search.to_lowercase()),
            None => true,
        })
        .filter(|b| match query.category {
            Some(id) => b.category.iter().any(|c| c.id == id),
            None => true,
        })
        .cloned()
        .collect();

    match query.order_by.as_deref() {
        Some(field) if ORDER_FIELDS.contains(&field) => selected.sort_by(|a, b| match field {
            "name" => a.name.cmp(&b.name),
            "price" => a.price.unwrap_or(0.0).total_cmp(&b.price.unwrap_or(0.0)),
            "date" => a.date.cmp(&b.date),
            _ => a.available_copy.cmp(&b.available_copy),
        }),
        _ => selected.sort_by_key(|b| b.id),
    }

    let size = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1) as usize;
    let page = query.page.unwrap_or(1).max(1) as usize;
    selected.into_iter().skip((page - 1) * size).take(size).collect()
}

#[async_trait]
impl CatalogApi for MemoryCatalog {
    async fn list_books(&self, query: &BookQuery) -> ApiResult<Vec<BookRecord>> {
        self.enter()?;
        Ok(select_books(&self.read().books, query))
    }

    async fn get_book(&self, id: i64) -> ApiResult<BookRecord> {
        self.enter()?;
        self.read()
            .books
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("book {}", id)))
    }

    async fn list_categories(&self) -> ApiResult<Vec<CategorySummary>> {
        self.enter()?;
        Ok(self.read().categories.clone())
    }

    async fn category_books(&self, id: i64, query: &BookQuery) -> ApiResult<Vec<BookRecord>> {
        self.enter()?;
        let query = query.clone().category(id);
        Ok(select_books(&self.read().books, &query))
    }

    async fn home_feed(&self) -> ApiResult<HomeFeed> {
        self.enter()?;
        Ok(self.read().feed.clone())
    }

    async fn login(&self, username: &str, password: &str) -> ApiResult<UserProfile> {
        self.enter()?;
        let mut data = self.write();
        let account = data
            .accounts
            .values()
            .find(|a| a.user.username == username || a.user.email == username)
            .filter(|a| a.password == password)
            .cloned()
            .ok_or(ApiError::Unauthorized)?;
        data.signed_in = Some(account.user.username.clone());
        Ok(account.user)
    }

    async fn register(&self, registration: &Registration) -> ApiResult<Ack> {
        self.enter()?;
        if registration.password != registration.password2 {
            return Err(ApiError::Status {
                status: 400,
                message: "Passwords do not match".to_string(),
            });
        }

        let mut data = self.write();
        if data.accounts.contains_key(&registration.username) {
            return Err(ApiError::Status {
                status: 400,
                message: format!("Username {} is taken", registration.username),
            });
        }

        let id = data.accounts.len() as i64 + 1;
        data.accounts.insert(
            registration.username.clone(),
            Account {
                user: UserProfile {
                    id,
                    username: registration.username.clone(),
                    email: registration.email.clone(),
                    is_admin: false,
                },
                password: registration.password.clone(),
            },
        );
        Ok(Ack {
            message: Some("Registered".to_string()),
        })
    }

    async fn logout(&self) -> ApiResult<Ack> {
        self.enter()?;
        self.require_user()?;
        self.write().signed_in = None;
        Ok(Ack::default())
    }

    async fn me(&self) -> ApiResult<UserProfile> {
        self.enter()?;
        self.require_user()
    }

    async fn profile(&self) -> ApiResult<ProfileDetails> {
        self.enter()?;
        let user = self.require_user()?;
        let mut details = self.read().profile.clone();
        details.profile.user = Some(user);
        Ok(details)
    }

    async fn user_stats(&self) -> ApiResult<UserStats> {
        self.enter()?;
        self.require_user()?;
        Ok(self.read().stats.clone())
    }

    async fn my_active_borrows(&self) -> ApiResult<Vec<BorrowRecord>> {
        self.enter()?;
        let user = self.require_user()?;
        let mut active: Vec<BorrowRecord> = self
            .read()
            .borrows
            .iter()
            .filter(|b| b.is_active() && b.user.as_ref().map(|u| u.id) == Some(user.id))
            .cloned()
            .collect();
        active.sort_by(|a, b| b.borrow_date.cmp(&a.borrow_date));
        Ok(active)
    }

    async fn borrow(&self, request: &BorrowRequest) -> ApiResult<BorrowReceipt> {
        self.enter()?;
        let user = self.require_user()?;
        let mut data = self.write();

        let limit = match data.profile.profile.borrow_limit {
            0 => DEFAULT_BORROW_LIMIT,
            limit => limit,
        };
        let held: Vec<&BorrowRecord> = data
            .borrows
            .iter()
            .filter(|b| b.is_active() && b.user.as_ref().map(|u| u.id) == Some(user.id))
            .collect();
        if held.len() >= limit as usize {
            return Err(bad_request(format!("Borrow limit of {} reached", limit)));
        }
        if held.iter().any(|b| b.book.id == request.book_id) {
            return Err(bad_request("You already borrowed this book"));
        }

        let book = data
            .books
            .iter_mut()
            .find(|b| b.id == request.book_id)
            .ok_or_else(|| ApiError::NotFound(format!("book {}", request.book_id)))?;
        match book.available_copy {
            Some(copies) if copies > 0 => book.available_copy = Some(copies - 1),
            _ => return Err(bad_request("No copies available")),
        }
        let book = book.clone();

        let id = data.borrows.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let borrow = BorrowRecord {
            id,
            user: Some(user),
            book,
            borrow_date: Utc::now(),
            return_date: request.return_date,
            is_return: false,
        };
        data.borrows.push(borrow.clone());
        tracing::debug!("Borrow {} created for book {}", id, request.book_id);
        Ok(BorrowReceipt {
            message: Some("Book borrowed".to_string()),
            borrow,
        })
    }

    async fn return_borrow(&self, borrow_id: i64) -> ApiResult<BorrowReceipt> {
        self.enter()?;
        let user = self.require_user()?;
        let mut data = self.write();

        let borrow = data
            .borrows
            .iter_mut()
            .find(|b| b.id == borrow_id)
            .ok_or_else(|| ApiError::NotFound(format!("borrow {}", borrow_id)))?;
        if !user.is_admin && borrow.user.as_ref().map(|u| u.id) != Some(user.id) {
            return Err(ApiError::Status {
                status: 403,
                message: "Not your borrow".to_string(),
            });
        }
        if borrow.is_return {
            return Err(bad_request("Book already returned"));
        }
        borrow.is_return = true;
        let borrow = borrow.clone();

        if let Some(book) = data.books.iter_mut().find(|b| b.id == borrow.book.id) {
            book.available_copy = Some(book.available_copy.unwrap_or(0) + 1);
        }

        let message = if Utc::now() > borrow.return_date {
            data.profile.profile.warning += 1;
            "Book returned late, a warning was added"
        } else {
            "Book returned"
        };
        Ok(BorrowReceipt {
            message: Some(message.to_string()),
            borrow,
        })
    }

    async fn purchase(&self, book_id: i64) -> ApiResult<Purchase> {
        self.enter()?;
        self.require_user()?;
        let mut data = self.write();

        let book = data
            .books
            .iter_mut()
            .find(|b| b.id == book_id)
            .ok_or_else(|| ApiError::NotFound(format!("book {}", book_id)))?;
        if !book.sell {
            return Err(bad_request("This book is not for sale"));
        }
        match book.available_copy {
            Some(copies) if copies > 0 => book.available_copy = Some(copies - 1),
            _ => return Err(bad_request("No copies available")),
        }
        Ok(Purchase {
            message: Some("Book purchased".to_string()),
            price: book.price,
            book: book.clone(),
        })
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Profile> {
        self.enter()?;
        let user = self.require_user()?;
        let mut data = self.write();
        update.apply(&mut data.profile.profile);
        let mut profile = data.profile.profile.clone();
        profile.user = Some(user);
        Ok(profile)
    }
}
