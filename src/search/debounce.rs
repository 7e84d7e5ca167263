// Search query debouncing
// Each keystroke restarts the timer; only the query that stays unchanged for
// the whole delay is handed on. Time is passed in so callers own the clock.

use std::time::{Duration, Instant};

pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
    settled: Option<String>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        SearchDebouncer {
            delay,
            pending: None,
            settled: None,
        }
    }

    /// Record a new query typed at `now`, superseding any pending one
    pub fn push(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some((query.into(), now));
    }

    /// When the pending query settles, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Return the pending query once its delay has elapsed at `now`
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.flush()
    }

    /// Hand on the pending query without waiting, e.g. when input has ended
    pub fn flush(&mut self) -> Option<String> {
        let (query, _) = self.pending.take()?;
        self.settled = Some(query.clone());
        Some(query)
    }

    /// The last query handed on by `poll` or `flush`
    pub fn settled(&self) -> Option<&str> {
        self.settled.as_deref()
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DELAY)
    }
}
