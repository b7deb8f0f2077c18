//! Core types shared between the catalog, the pages and the REST collaborator

mod account;
mod book;
mod borrow;
mod feed;

pub use account::{Ack, Profile, ProfileDetails, Registration, UserProfile, UserStats};
pub use book::{BookRecord, CategoryRef};
pub use borrow::{BorrowReceipt, BorrowRecord, BorrowRequest, ProfileUpdate, Purchase};
pub use feed::{AuthorSummary, Banner, CategorySummary, HomeFeed};
