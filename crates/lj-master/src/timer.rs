//! Polled repeating timer driven by the caller's clock.

use std::time::{Duration, Instant};

/// Fires at most once per poll, then re-arms one period after the poll
/// that fired. Missed periods are not replayed.
#[derive(Clone, Debug)]
pub struct Ticker {
    period: Duration,
    next: Option<Instant>,
}

impl Ticker {
    /// A stopped ticker.
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.next.is_some()
    }

    /// (Re)start so the first tick lands one period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    /// True if a period has elapsed since the last tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(due) if now >= due => {
                self.next = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}
