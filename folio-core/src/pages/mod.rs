//! Page controllers
//!
//! Each page owns the state one screen needs: what was fetched, what the user typed, and whether
//! a fetch is still pending. Rendering is left to the caller.

mod auth;
mod catalog;
mod home;
mod layout;
mod profile;

pub use auth::{AuthMode, AuthPage};
pub use catalog::{CatalogOutcome, CatalogPage};
pub use home::HomePage;
pub use layout::Layout;
pub use profile::{ProfilePage, ProfileSnapshot};

/// Progress of the page's data fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    /// The fetch failed; the page shows empty data
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Identifies one fetch; results carrying an outdated ticket are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Generation counter shared by the pages
#[derive(Debug, Default)]
struct LoadGuard {
    generation: u64,
    state: LoadState,
}

impl LoadGuard {
    fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket {
            generation: self.generation,
        }
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation
    }
}
