//! Trailing-edge debounce, driven by tickets instead of timers.
//!
//! The engine has no clock. Each [`Debounce::push`] hands back a ticket; the
//! host schedules a timer for [`Debounce::delay`] and presents the ticket to
//! [`Debounce::settle`] when it fires. Only the newest ticket settles, so a
//! timer that was not cancelled in time still cannot propagate a superseded
//! value.

use std::time::Duration;

/// Proof that a value was pushed. Compared by generation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceTicket(u64);

#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    settled: T,
    pending: Option<T>,
    generation: u64,
}

impl<T: Clone + PartialEq> Debounce<T> {
    /// Start with `initial` already settled.
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial,
            pending: None,
            generation: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new input value. Any earlier ticket is now stale.
    pub fn push(&mut self, value: T) -> DebounceTicket {
        self.generation += 1;
        self.pending = Some(value);
        DebounceTicket(self.generation)
    }

    /// Promote the pending value if `ticket` is the latest one.
    ///
    /// Returns the newly settled value when it differs from the previous
    /// settled value, `None` otherwise.
    pub fn settle(&mut self, ticket: DebounceTicket) -> Option<&T> {
        if ticket.0 != self.generation {
            return None;
        }
        let value = self.pending.take()?;
        if value == self.settled {
            return None;
        }
        self.settled = value;
        Some(&self.settled)
    }

    /// Replace both settled and pending state without waiting.
    pub fn force(&mut self, value: T) {
        self.generation += 1;
        self.pending = None;
        self.settled = value;
    }

    /// The last value that made it through.
    pub fn value(&self) -> &T {
        &self.settled
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debounce() -> Debounce<String> {
        Debounce::new(String::new(), Duration::from_millis(300))
    }

    #[test]
    fn only_latest_ticket_settles() {
        let mut d = debounce();
        let a = d.push("a".into());
        let ab = d.push("ab".into());
        let abc = d.push("abc".into());

        assert_eq!(d.settle(a), None);
        assert_eq!(d.settle(ab), None);
        assert_eq!(d.value(), "");
        assert_eq!(d.settle(abc).map(String::as_str), Some("abc"));
        assert_eq!(d.value(), "abc");
    }

    #[test]
    fn settling_twice_is_a_noop() {
        let mut d = debounce();
        let t = d.push("x".into());
        assert!(d.settle(t).is_some());
        assert!(d.settle(t).is_none());
    }

    #[test]
    fn unchanged_value_does_not_propagate() {
        let mut d = Debounce::new("shoe".to_string(), Duration::from_millis(300));
        d.push("shoes".into());
        let back = d.push("shoe".into());
        assert_eq!(d.settle(back), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn force_invalidates_outstanding_tickets() {
        let mut d = debounce();
        let t = d.push("typed".into());
        d.force(String::new());
        assert_eq!(d.settle(t), None);
        assert_eq!(d.value(), "");
        assert_eq!(d.pending(), None);
    }
}
