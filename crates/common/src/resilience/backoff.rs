//! Capped exponential backoff
//!
//! `delay(i) = min(base * 2^i, cap)` for the 0-indexed attempt `i`. No
//! jitter: polling budgets are part of the vendor contract and must be
//! reproducible.

use std::time::Duration;

/// Delay policy plus attempt budget for one polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    base: Duration,
    cap: Duration,
    max_attempts: u32,
}

impl ExponentialBackoff {
    #[must_use]
    pub fn new(base: Duration, cap: Duration, max_attempts: u32) -> Self {
        Self { base, cap, max_attempts }
    }

    #[must_use]
    pub fn from_secs(base_secs: u64, cap_secs: u64, max_attempts: u32) -> Self {
        Self::new(Duration::from_secs(base_secs), Duration::from_secs(cap_secs), max_attempts)
    }

    /// Delay to wait after the 0-indexed `attempt`.
    ///
    /// Saturates at `cap` instead of overflowing for large attempt numbers.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        2u32
            .checked_pow(attempt)
            .and_then(|factor| self.base.checked_mul(factor))
            .map_or(self.cap, |delay| delay.min(self.cap))
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn base(&self) -> Duration {
        self.base
    }

    #[must_use]
    pub fn cap(&self) -> Duration {
        self.cap
    }

    /// True when `attempt` (0-indexed) is the last one the budget allows.
    #[must_use]
    pub fn is_last_attempt(&self, attempt: u32) -> bool {
        attempt.saturating_add(1) >= self.max_attempts
    }

    /// Replace the base delay, keeping cap and budget.
    #[must_use]
    pub fn with_base(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    /// Every delay the budget can produce, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_attempts).map(|attempt| self.delay(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_until_cap() {
        let backoff = ExponentialBackoff::from_secs(5, 220, 50);
        let delays: Vec<u64> = (0..7).map(|i| backoff.delay(i).as_secs()).collect();
        assert_eq!(delays, vec![5, 10, 20, 40, 80, 160, 220]);
    }

    #[test]
    fn match_polling_schedule() {
        let backoff = ExponentialBackoff::from_secs(10, 220, 50);
        let delays: Vec<u64> = (0..6).map(|i| backoff.delay(i).as_secs()).collect();
        assert_eq!(delays, vec![10, 20, 40, 80, 160, 220]);
    }

    #[test]
    fn large_attempts_saturate_at_cap() {
        let backoff = ExponentialBackoff::from_secs(5, 220, 50);
        assert_eq!(backoff.delay(31), Duration::from_secs(220));
        assert_eq!(backoff.delay(32), Duration::from_secs(220));
        assert_eq!(backoff.delay(u32::MAX), Duration::from_secs(220));
    }

    #[test]
    fn last_attempt_respects_budget() {
        let backoff = ExponentialBackoff::from_secs(1, 2, 3);
        assert!(!backoff.is_last_attempt(1));
        assert!(backoff.is_last_attempt(2));
        assert_eq!(backoff.delays().count(), 3);
    }
}
