//! Trailing-edge debouncing for preview updates.
//!
//! Every commit replaces the pending value and pushes its deadline out by
//! the full delay. Each commit bumps a generation counter; a timer armed for
//! an older generation finds the counter moved on and releases nothing.

use smol::Timer;
use std::time::{Duration, Instant};

struct Pending<T> {
    value: T,
    due: Instant,
}

pub struct Debouncer<T> {
    delay: Duration,
    generation: usize,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Replaces any pending value with `value`, due `delay` after `now`.
    ///
    /// Returns the generation to hand to [`Debouncer::fire`].
    pub fn commit(&mut self, value: T, now: Instant) -> usize {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(Pending {
            value,
            due: now + self.delay,
        });
        self.generation
    }

    /// Releases the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if pending.due <= now => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Releases the pending value if no commit happened after `generation`.
    pub fn fire(&mut self, generation: usize) -> Option<T> {
        if generation != self.generation {
            return None;
        }
        self.pending.take().map(|p| p.value)
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Drops the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
    }

    /// Releases the pending value now, ignoring its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Waits out the pending deadline and releases the value.
    pub async fn settle(&mut self) -> Option<T> {
        let due = self.due()?;
        Timer::at(due).await;
        self.poll(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(350);

    #[test]
    fn test_releases_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        debouncer.commit("a", start);

        assert_eq!(debouncer.poll(start), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(349)), None);
        assert_eq!(debouncer.poll(start + DELAY), Some("a"));
        assert_eq!(debouncer.poll(start + DELAY * 2), None);
    }

    #[test]
    fn test_latest_commit_wins_and_resets_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        debouncer.commit(1, start);
        debouncer.commit(2, start + Duration::from_millis(200));
        debouncer.commit(3, start + Duration::from_millis(300));

        assert_eq!(debouncer.pending(), Some(&3));
        assert_eq!(debouncer.poll(start + DELAY), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(650)), Some(3));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_stale_generation_releases_nothing() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        let first = debouncer.commit("old", start);
        let second = debouncer.commit("new", start);

        assert_eq!(debouncer.fire(first), None);
        assert_eq!(debouncer.fire(second), Some("new"));
        assert_eq!(debouncer.fire(second), None);
    }

    #[test]
    fn test_cancel_and_flush() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        let generation = debouncer.commit("x", start);
        debouncer.cancel();
        assert_eq!(debouncer.fire(generation), None);
        assert_eq!(debouncer.poll(start + DELAY), None);

        debouncer.commit("y", start);
        assert_eq!(debouncer.flush(), Some("y"));
        assert_eq!(debouncer.flush(), None);
    }

    #[test]
    fn test_settle_waits_for_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_millis(20));
        debouncer.commit("first", Instant::now());
        debouncer.commit("second", Instant::now());

        let started = Instant::now();
        let released = smol::block_on(debouncer.settle());

        assert_eq!(released, Some("second"));
        assert!(started.elapsed() >= Duration::from_millis(10));
        assert_eq!(smol::block_on(debouncer.settle()), None);
    }

    #[test]
    fn test_timer_armed_per_commit() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));

        let stale = debouncer.commit(1, Instant::now());
        let current = debouncer.commit(2, Instant::now());

        let released = smol::block_on(async {
            Timer::after(debouncer.delay()).await;
            let from_stale = debouncer.fire(stale);
            Timer::after(debouncer.delay()).await;
            (from_stale, debouncer.fire(current))
        });

        assert_eq!(released, (None, Some(2)));
    }
}
