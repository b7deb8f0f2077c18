//! Hero rotation scheduler
//!
//! The landing page highlights a handful of featured books, advancing to the next one on a fixed
//! period. [`HeroRotation`] is the pure state machine; [`HeroScheduler`] pairs it with a timer
//! from a [`TimerDriver`] and guarantees the timer is released whenever rotation ends: on
//! [`HeroScheduler::stop`], when the items are replaced, and when the scheduler is dropped.
//!
//! A manual [`HeroScheduler::select`] keeps the timer phase: the next automatic advance still
//! happens at the next scheduled tick.

mod timer;

pub use timer::{ManualDriver, TickFn, TimerDriver, TimerHandle, TokioDriver};

use crate::error::HeroError;
use crate::types::BookRecord;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

/// Whether rotation is possible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationState {
    /// Zero or one item
    Idle,
    /// Two or more items
    Rotating,
}

/// Current hero item over a fixed list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeroRotation {
    items: Vec<BookRecord>,
    current: usize,
}

impl HeroRotation {
    pub fn new(items: Vec<BookRecord>) -> Self {
        Self { items, current: 0 }
    }

    pub fn state(&self) -> RotationState {
        if self.items.len() > 1 {
            RotationState::Rotating
        } else {
            RotationState::Idle
        }
    }

    pub fn items(&self) -> &[BookRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_item(&self) -> Option<&BookRecord> {
        self.items.get(self.current)
    }

    /// Move to the next item, wrapping around; no-op while idle
    pub fn advance(&mut self) -> usize {
        if self.state() == RotationState::Rotating {
            self.current = (self.current + 1) % self.items.len();
        }
        self.current
    }

    /// Jump to `index`
    pub fn select(&mut self, index: usize) -> Result<(), HeroError> {
        if index >= self.items.len() {
            return Err(HeroError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    /// Swap in a new item list and start over from the first item
    pub fn replace(&mut self, items: Vec<BookRecord>) {
        self.items = items;
        self.current = 0;
    }
}

struct Shared {
    rotation: HeroRotation,
    /// Bumped whenever the active timer changes; ticks from older timers are ignored
    generation: u64,
}

/// Drives a [`HeroRotation`] from a repeating timer
pub struct HeroScheduler<D: TimerDriver> {
    driver: D,
    period: Duration,
    shared: Arc<Mutex<Shared>>,
    timer: Option<TimerHandle>,
}

impl<D: TimerDriver> HeroScheduler<D> {
    /// Idle scheduler with no items; `period` must be non-zero
    pub fn new(driver: D, period: Duration) -> Result<Self, HeroError> {
        if period.is_zero() {
            return Err(HeroError::ZeroPeriod(period));
        }
        Ok(Self {
            driver,
            period,
            shared: Arc::new(Mutex::new(Shared {
                rotation: HeroRotation::default(),
                generation: 0,
            })),
            timer: None,
        })
    }

    /// Scheduler already rotating over `items`
    pub fn with_items(
        driver: D,
        period: Duration,
        items: Vec<BookRecord>,
    ) -> Result<Self, HeroError> {
        let mut scheduler = Self::new(driver, period)?;
        scheduler.set_items(items);
        Ok(scheduler)
    }

    fn shared(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Replace the items, restarting rotation from the first one
    pub fn set_items(&mut self, items: Vec<BookRecord>) {
        self.cancel_timer();

        let (generation, state) = {
            let mut shared = self.shared();
            shared.generation += 1;
            shared.rotation.replace(items);
            (shared.generation, shared.rotation.state())
        };

        if state == RotationState::Rotating {
            self.arm(generation);
        }
    }

    fn arm(&mut self, generation: u64) {
        let weak: Weak<Mutex<Shared>> = Arc::downgrade(&self.shared);
        let tick: TickFn = Arc::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if shared.generation == generation {
                let index = shared.rotation.advance();
                tracing::trace!("Hero advanced to {}", index);
            }
        });

        tracing::debug!(
            "Arming hero rotation every {:?} (generation {})",
            self.period,
            generation
        );
        self.timer = Some(self.driver.arm(self.period, tick));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
            self.shared().generation += 1;
            tracing::debug!("Hero rotation timer cancelled");
        }
    }

    /// Stop rotating; the current item stays selected
    pub fn stop(&mut self) {
        self.cancel_timer();
    }

    /// Whether a timer is currently armed
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn state(&self) -> RotationState {
        self.shared().rotation.state()
    }

    pub fn current_index(&self) -> usize {
        self.shared().rotation.current_index()
    }

    pub fn current_item(&self) -> Option<BookRecord> {
        self.shared().rotation.current_item().cloned()
    }

    pub fn items(&self) -> Vec<BookRecord> {
        self.shared().rotation.items().to_vec()
    }

    pub fn len(&self) -> usize {
        self.shared().rotation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared().rotation.is_empty()
    }

    /// Jump to `index` without restarting the timer
    pub fn select(&self, index: usize) -> Result<(), HeroError> {
        let result = self.shared().rotation.select(index);
        if let Err(ref e) = result {
            tracing::debug!("Ignoring hero selection: {}", e);
        }
        result
    }
}

impl<D: TimerDriver> Drop for HeroScheduler<D> {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
