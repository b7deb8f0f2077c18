//! Account, profile and borrowing statistics types

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// The signed-in user as returned by login and `me`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Library profile attached to a user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub borrow_limit: u32,
    #[serde(default)]
    pub warning: u32,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<u64>,
}

/// Profile plus the borrow counters the profile endpoint computes alongside it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileDetails {
    #[serde(rename = "data")]
    pub profile: Profile,
    #[serde(default)]
    pub active_borrows: u32,
    #[serde(default)]
    pub remaining_borrow_limit: i64,
}

/// Borrowing statistics for the signed-in user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStats {
    #[serde(default)]
    pub active_borrows: u32,
    #[serde(default)]
    pub borrow_limit: u32,
    /// Can go negative when the limit was lowered below the active count
    #[serde(default)]
    pub remaining_borrow_limit: i64,
    #[serde(default)]
    pub total_borrows: u32,
    #[serde(default)]
    pub returned_borrows: u32,
    #[serde(default)]
    pub warnings: u32,
    #[serde(default)]
    pub overdue_borrows: u32,
}

impl UserStats {
    /// Share of the borrow limit in use, clamped to `0.0..=1.0`
    pub fn usage_ratio(&self) -> f64 {
        if self.borrow_limit == 0 {
            return 0.0;
        }
        (self.active_borrows as f64 / self.borrow_limit as f64).clamp(0.0, 1.0)
    }

    pub fn has_overdue(&self) -> bool {
        self.overdue_borrows > 0
    }
}

/// Registration form payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

impl Registration {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        password2: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            password2: password2.into(),
        }
    }

    /// Check the form locally before anything is sent
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingField("username"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        if self.password != self.password2 {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Acknowledgement returned by mutating endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
