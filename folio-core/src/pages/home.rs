//! Landing page

use super::{LoadGuard, LoadState, LoadTicket};
use crate::api::{ApiResult, CatalogApi};
use crate::error::HeroError;
use crate::hero::{HeroScheduler, TimerDriver};
use crate::types::{CategorySummary, HomeFeed};

/// Landing page: feed sections, category chips, and the rotating hero
pub struct HomePage<D: TimerDriver> {
    feed: HomeFeed,
    selected_category: Option<i64>,
    hero: HeroScheduler<D>,
    load: LoadGuard,
}

impl<D: TimerDriver> HomePage<D> {
    /// Empty page; fails when `hero_period` is zero
    pub fn new(driver: D, hero_period: std::time::Duration) -> Result<Self, HeroError> {
        Ok(Self {
            feed: HomeFeed::default(),
            selected_category: None,
            hero: HeroScheduler::new(driver, hero_period)?,
            load: LoadGuard::default(),
        })
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.load.begin()
    }

    /// Apply a feed response; the hero restarts over the new items
    pub fn finish_load(&mut self, ticket: LoadTicket, result: ApiResult<HomeFeed>) -> bool {
        if !self.load.is_current(ticket) {
            tracing::debug!("Dropping outdated home feed response");
            return false;
        }

        match result {
            Ok(feed) => {
                self.feed = feed;
                self.load.state = LoadState::Ready;
            }
            Err(e) => {
                tracing::error!("Error fetching home feed: {}", e);
                self.feed = HomeFeed::default();
                self.load.state = LoadState::Failed(e.to_string());
            }
        }

        if let Some(id) = self.selected_category {
            if !self.feed.categories.iter().any(|c| c.id == id) {
                self.selected_category = None;
            }
        }
        self.hero.set_items(self.feed.hero_items());
        true
    }

    pub async fn load(&mut self, api: &dyn CatalogApi) {
        let ticket = self.begin_load();
        let result = api.home_feed().await;
        self.finish_load(ticket, result);
    }

    pub fn feed(&self) -> &HomeFeed {
        &self.feed
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load.state
    }

    pub fn categories(&self) -> &[CategorySummary] {
        &self.feed.categories
    }

    /// Select a category chip; selecting the active one clears the selection
    pub fn toggle_category(&mut self, id: i64) -> Option<i64> {
        self.selected_category = if self.selected_category == Some(id) {
            None
        } else {
            Some(id)
        };
        self.selected_category
    }

    pub fn selected_category(&self) -> Option<i64> {
        self.selected_category
    }

    pub fn hero(&self) -> &HeroScheduler<D> {
        &self.hero
    }

    pub fn hero_mut(&mut self) -> &mut HeroScheduler<D> {
        &mut self.hero
    }
}
