//! Profile and borrowing statistics dashboard

use super::{LoadGuard, LoadState, LoadTicket};
use crate::api::{ApiResult, CatalogApi};
use crate::error::{ApiError, Result};
use crate::session::SessionContext;
use crate::types::{BorrowReceipt, BorrowRecord, ProfileDetails, UserStats};

/// Everything the profile page fetches in one load
pub type ProfileSnapshot = (ProfileDetails, UserStats, Vec<BorrowRecord>);

/// Profile page; only reachable with a signed-in session
#[derive(Debug)]
pub struct ProfilePage {
    session: SessionContext,
    details: Option<ProfileDetails>,
    stats: Option<UserStats>,
    borrows: Vec<BorrowRecord>,
    load: LoadGuard,
}

impl ProfilePage {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            details: None,
            stats: None,
            borrows: Vec::new(),
            load: LoadGuard::default(),
        }
    }

    /// Start a fetch; `Unauthorized` without a session, nothing is sent in that case
    pub fn begin_load(&mut self) -> Result<LoadTicket> {
        if !self.session.is_authenticated() {
            return Err(ApiError::Unauthorized.into());
        }
        Ok(self.load.begin())
    }

    /// Apply a fetch result, returns `Ok(false)` when the ticket is outdated
    ///
    /// A rejected session is invalidated and reported as `Unauthorized` so the caller can send
    /// the user to the login form. Other failures are logged and leave the page empty.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: ApiResult<ProfileSnapshot>,
    ) -> Result<bool> {
        if !self.load.is_current(ticket) {
            tracing::debug!("Dropping outdated profile response");
            return Ok(false);
        }

        match result {
            Ok((details, stats, borrows)) => {
                self.details = Some(details);
                self.stats = Some(stats);
                self.borrows = borrows;
                self.load.state = LoadState::Ready;
                Ok(true)
            }
            Err(ApiError::Unauthorized) => {
                self.session.invalidate();
                self.clear();
                self.load.state = LoadState::Failed(ApiError::Unauthorized.to_string());
                Err(ApiError::Unauthorized.into())
            }
            Err(e) => {
                tracing::error!("Error fetching profile: {}", e);
                self.clear();
                self.load.state = LoadState::Failed(e.to_string());
                Ok(true)
            }
        }
    }

    /// Fetch profile, stats and active borrows together
    pub async fn load(&mut self, api: &dyn CatalogApi) -> Result<()> {
        let ticket = self.begin_load()?;
        let result = futures::try_join!(api.profile(), api.user_stats(), api.my_active_borrows());
        self.finish_load(ticket, result)?;
        Ok(())
    }

    /// Return one of the listed borrows, then reload the page
    pub async fn return_borrow(
        &mut self,
        api: &dyn CatalogApi,
        borrow_id: i64,
    ) -> Result<BorrowReceipt> {
        if !self.session.is_authenticated() {
            return Err(ApiError::Unauthorized.into());
        }
        let receipt = match api.return_borrow(borrow_id).await {
            Ok(receipt) => receipt,
            Err(ApiError::Unauthorized) => {
                self.session.invalidate();
                return Err(ApiError::Unauthorized.into());
            }
            Err(e) => return Err(e.into()),
        };
        self.load(api).await?;
        Ok(receipt)
    }

    fn clear(&mut self) {
        self.details = None;
        self.stats = None;
        self.borrows.clear();
    }

    pub fn details(&self) -> Option<&ProfileDetails> {
        self.details.as_ref()
    }

    pub fn stats(&self) -> Option<&UserStats> {
        self.stats.as_ref()
    }

    /// Unreturned borrows, newest first
    pub fn borrows(&self) -> &[BorrowRecord] {
        &self.borrows
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load.state
    }
}
