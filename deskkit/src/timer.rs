//! Cancellable debounce timer.
//!
//! A [`Debounce`] holds at most one pending value. Scheduling a new value
//! replaces the pending one and restarts the quiet period; the value fires
//! exactly once, the first time it is polled at or after its deadline.
//! There is no background thread: the owner polls with the current instant,
//! and event loops can sleep until [`Debounce::deadline`].

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Single-slot debounce timer.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debounce<T> {
    /// Create an idle timer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` to fire after the quiet period.
    ///
    /// Returns `true` if a pending value was replaced.
    pub fn schedule(&mut self, value: T, now: Instant) -> bool {
        let replaced = self.pending.is_some();
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
        replaced
    }

    /// Whether a value is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending value, if any.
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    /// When the pending value will fire.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Fire the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Fire the pending value immediately, ignoring the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_fires_once_after_deadline() {
        let start = Instant::now();
        let mut timer = Debounce::new(DELAY);
        timer.schedule("a", start);

        assert_eq!(timer.poll(start + Duration::from_millis(299)), None);
        assert_eq!(timer.poll(start + DELAY), Some("a"));
        assert_eq!(timer.poll(start + DELAY * 2), None);
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_reschedule_replaces_and_restarts() {
        let start = Instant::now();
        let mut timer = Debounce::new(DELAY);
        assert!(!timer.schedule("a", start));
        assert!(timer.schedule("b", start + Duration::from_millis(200)));

        assert_eq!(timer.poll(start + DELAY), None);
        assert_eq!(timer.pending(), Some(&"b"));
        assert_eq!(timer.poll(start + Duration::from_millis(500)), Some("b"));
    }

    #[test]
    fn test_cancel_discards_value() {
        let start = Instant::now();
        let mut timer = Debounce::new(DELAY);
        timer.schedule(1, start);

        assert_eq!(timer.cancel(), Some(1));
        assert_eq!(timer.deadline(), None);
        assert_eq!(timer.poll(start + DELAY), None);
    }
}
