//! Repeating timers used by the hero scheduler

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior};

/// Callback invoked on every timer tick
pub type TickFn = Arc<dyn Fn() + Send + Sync>;

/// Source of repeating timers
pub trait TimerDriver: Send + Sync {
    /// Start calling `tick` every `period`, first call one period from now
    fn arm(&self, period: Duration, tick: TickFn) -> TimerHandle;
}

/// An armed timer; cancelled exactly once, on [`TimerHandle::cancel`] or on drop
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.fire_cancel();
    }

    fn fire_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.fire_cancel();
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Timers backed by tasks on a tokio runtime
#[derive(Debug, Clone)]
pub struct TokioDriver {
    handle: Handle,
}

impl TokioDriver {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Driver for the runtime this is called from
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime, like [`Handle::current`].
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

/// Shortest period a tokio timer is armed with; `interval_at` rejects zero
const MIN_TOKIO_PERIOD: Duration = Duration::from_millis(1);

impl TimerDriver for TokioDriver {
    fn arm(&self, period: Duration, tick: TickFn) -> TimerHandle {
        if period < MIN_TOKIO_PERIOD {
            tracing::warn!("Timer period {:?} raised to {:?}", period, MIN_TOKIO_PERIOD);
        }
        let period = period.max(MIN_TOKIO_PERIOD);
        let task = self.handle.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick();
            }
        });
        TimerHandle::new(move || task.abort())
    }
}

#[derive(Default)]
struct ManualState {
    timers: Vec<ManualTimer>,
    invocations: usize,
    cancels: usize,
}

struct ManualTimer {
    period: Duration,
    tick: TickFn,
    active: bool,
}

/// Hand-driven timers for tests and demos
///
/// Nothing fires on its own; [`ManualDriver::fire`] runs one tick of every live timer.
/// Every armed timer stays recorded after it is cancelled, so [`ManualDriver::armed`] counts
/// the whole history; memory grows with each arm and is only released with the last clone.
#[derive(Clone, Default)]
pub struct ManualDriver {
    state: Arc<Mutex<ManualState>>,
}

impl ManualDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one tick of every live timer, returns how many callbacks ran
    pub fn fire(&self) -> usize {
        let ticks: Vec<TickFn> = {
            let state = self.state();
            state
                .timers
                .iter()
                .filter(|t| t.active)
                .map(|t| Arc::clone(&t.tick))
                .collect()
        };

        for tick in &ticks {
            tick();
        }
        self.state().invocations += ticks.len();
        ticks.len()
    }

    /// Timers armed so far, live or not
    pub fn armed(&self) -> usize {
        self.state().timers.len()
    }

    /// Timers currently live
    pub fn active(&self) -> usize {
        self.state().timers.iter().filter(|t| t.active).count()
    }

    pub fn cancelled(&self) -> usize {
        self.state().cancels
    }

    /// Tick callbacks run so far
    pub fn invocations(&self) -> usize {
        self.state().invocations
    }

    /// Period of the most recently armed timer
    pub fn last_period(&self) -> Option<Duration> {
        self.state().timers.last().map(|t| t.period)
    }
}

impl TimerDriver for ManualDriver {
    fn arm(&self, period: Duration, tick: TickFn) -> TimerHandle {
        let index = {
            let mut state = self.state();
            state.timers.push(ManualTimer {
                period,
                tick,
                active: true,
            });
            state.timers.len() - 1
        };

        let shared = Arc::clone(&self.state);
        TimerHandle::new(move || {
            let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
            let state = &mut *guard;
            if let Some(timer) = state.timers.get_mut(index) {
                if timer.active {
                    timer.active = false;
                    state.cancels += 1;
                }
            }
        })
    }
}
