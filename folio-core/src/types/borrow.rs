//! Borrowing, purchase and profile-edit payloads

use super::{BookRecord, Profile, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A loan of one book to one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BorrowRecord {
    pub id: i64,
    #[serde(default)]
    pub user: Option<UserProfile>,
    pub book: BookRecord,
    pub borrow_date: DateTime<Utc>,
    /// Due date
    pub return_date: DateTime<Utc>,
    #[serde(default)]
    pub is_return: bool,
}

impl BorrowRecord {
    pub fn is_active(&self) -> bool {
        !self.is_return
    }

    /// Still out after its due date
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && now > self.return_date
    }
}

/// Request body for borrowing a book until `return_date`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BorrowRequest {
    pub book_id: i64,
    pub return_date: DateTime<Utc>,
}

impl BorrowRequest {
    pub fn new(book_id: i64, return_date: DateTime<Utc>) -> Self {
        Self {
            book_id,
            return_date,
        }
    }

    /// Borrow for `days` days starting now
    pub fn for_days(book_id: i64, days: u32) -> Self {
        Self::new(book_id, Utc::now() + chrono::Duration::days(days.into()))
    }
}

/// Outcome of borrowing or returning; the message says when a late return added a warning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BorrowReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "data")]
    pub borrow: BorrowRecord,
}

/// Outcome of buying a copy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Purchase {
    #[serde(default)]
    pub message: Option<String>,
    /// The book with its remaining stock
    pub book: BookRecord,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Editable profile fields; unset fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<u64>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.address.is_none() && self.phone.is_none()
    }

    /// Apply the set fields to `profile`
    pub fn apply(&self, profile: &mut Profile) {
        if let Some(address) = &self.address {
            profile.address = Some(address.clone());
        }
        if let Some(phone) = self.phone {
            profile.phone = Some(phone);
        }
    }
}
