//! Book list page

use super::{LoadGuard, LoadState, LoadTicket};
use crate::api::{ApiResult, BookQuery, CatalogApi};
use crate::catalog::{compute_view, dedupe_by_id, QueryState, SortKey};
use crate::types::BookRecord;

/// What the book list should show
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogOutcome<'a> {
    /// Fetch still pending
    Loading,
    /// Nothing was fetched
    Empty,
    /// Books were fetched but the search filtered all of them out
    NoMatch,
    Books(Vec<&'a BookRecord>),
}

/// The "all books" page: raw collection plus the user's query
#[derive(Debug, Default)]
pub struct CatalogPage {
    raw: Vec<BookRecord>,
    query: QueryState,
    category: Option<i64>,
    load: LoadGuard,
}

impl CatalogPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page restricted to one category
    pub fn for_category(category: i64) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    /// Start a fetch; the returned ticket must be handed to [`CatalogPage::finish_load`]
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load.begin()
    }

    /// Apply a fetch result, returns `false` when the ticket is outdated
    ///
    /// Failures are logged and leave the page with an empty collection.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: ApiResult<Vec<BookRecord>>) -> bool {
        if !self.load.is_current(ticket) {
            tracing::debug!("Dropping outdated book list response");
            return false;
        }

        match result {
            Ok(books) => {
                tracing::debug!("Fetched {} books", books.len());
                self.raw = dedupe_by_id(books);
                self.load.state = LoadState::Ready;
            }
            Err(e) => {
                tracing::error!("Error fetching books: {}", e);
                self.raw.clear();
                self.load.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    /// Fetch up to `limit` books
    pub async fn load(&mut self, api: &dyn CatalogApi, limit: u32) {
        let ticket = self.begin_load();
        let query = BookQuery::with_limit(limit);
        let result = match self.category {
            Some(id) => api.category_books(id, &query).await,
            None => api.list_books(&query).await,
        };
        self.finish_load(ticket, result);
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.search_text = text.into();
    }

    pub fn set_sort(&mut self, key: SortKey) {
        self.query.sort_key = key;
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn category(&self) -> Option<i64> {
        self.category
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load.state
    }

    /// The raw collection as fetched
    pub fn books(&self) -> &[BookRecord] {
        &self.raw
    }

    /// Derived view under the current query
    pub fn view(&self) -> Vec<&BookRecord> {
        compute_view(&self.raw, &self.query)
    }

    pub fn outcome(&self) -> CatalogOutcome<'_> {
        if self.load.state.is_loading() {
            return CatalogOutcome::Loading;
        }
        if self.raw.is_empty() {
            return CatalogOutcome::Empty;
        }
        let view = self.view();
        if view.is_empty() {
            CatalogOutcome::NoMatch
        } else {
            CatalogOutcome::Books(view)
        }
    }
}
