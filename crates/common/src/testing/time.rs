//! Controllable time doubles
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use riskscreen_common::testing::MockClock;
//! use riskscreen_common::time::Clock;
//!
//! let mock = MockClock::new();
//! let start = mock.unix_seconds();
//! mock.advance(Duration::from_secs(5));
//! assert_eq!(mock.unix_seconds() - start, 5);
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant, SystemTime};

use async_trait::async_trait;

use crate::time::{Clock, SleepOutcome, Sleeper};

/// Mock clock for deterministic testing
///
/// Starts at the current real time and only moves when advanced.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
    base_system_time: SystemTime,
}

impl MockClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            base_system_time: SystemTime::now(),
        }
    }

    /// Simulate time passing without actually waiting.
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner) += duration;
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }

    fn system_time(&self) -> SystemTime {
        self.base_system_time + self.elapsed()
    }
}

/// Sleeper that returns immediately and records every requested delay
///
/// Optionally reports cancellation once a number of waits has happened.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
    cancel_after: Option<usize>,
}

impl RecordingSleeper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The wait with index `waits` (0-indexed) and every later one report
    /// [`SleepOutcome::Cancelled`].
    #[must_use]
    pub fn cancel_after(waits: usize) -> Self {
        Self { delays: Arc::default(), cancel_after: Some(waits) }
    }

    /// Delays requested so far, in order.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Requested delays in whole seconds, for compact assertions.
    #[must_use]
    pub fn delay_secs(&self) -> Vec<u64> {
        self.delays().iter().map(Duration::as_secs).collect()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) -> SleepOutcome {
        let mut delays = self.delays.lock().unwrap_or_else(PoisonError::into_inner);
        let index = delays.len();
        delays.push(duration);
        match self.cancel_after {
            Some(limit) if index >= limit => SleepOutcome::Cancelled,
            _ => SleepOutcome::Elapsed,
        }
    }
}
