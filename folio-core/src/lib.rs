//! Folio Core Library
//!
//! This crate provides the data model and client-side logic for the Folio library/bookstore
//! client. Book lists fetched from the backend are turned into derived views by the catalog
//! query engine, and featured books are rotated on the landing page by the hero scheduler.

pub mod api;
pub mod catalog;
pub mod config;
pub mod covers;
pub mod error;
pub mod format;
pub mod hero;
pub mod pages;
pub mod session;
pub mod types;

pub use api::{BookQuery, CatalogApi, MemoryCatalog};
pub use catalog::{compute_view, dedupe_by_id, QueryState, SortKey};
pub use config::FolioConfig;
pub use covers::{media_url, CoverResolver};
pub use error::{ApiError, ConfigError, FolioError, HeroError, Result, ValidationError};
pub use hero::{HeroRotation, HeroScheduler, RotationState, TimerDriver, TimerHandle, TokioDriver};
pub use session::SessionContext;
pub use types::{
    Ack, AuthorSummary, Banner, BookRecord, BorrowReceipt, BorrowRecord, BorrowRequest,
    CategoryRef, CategorySummary, HomeFeed, Profile, ProfileDetails, ProfileUpdate, Purchase,
    Registration, UserProfile, UserStats,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_is_passthrough() {
        let books = vec![BookRecord::new(2, "B"), BookRecord::new(1, "A")];
        let view = compute_view(&books, &QueryState::default());
        let ids: Vec<i64> = view.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
