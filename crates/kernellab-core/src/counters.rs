//! Counter Store: the three shared counters and the lock guarding them
//!
//! Every read or write of a counter goes through [`CounterStore::lock`].
//! The returned guard is the only way to mutate the counts, so the
//! "lock held" precondition of `increment`/`reset`/`report_aggregate` is
//! enforced by the type system instead of by convention.
//!
//! Lock order: the store lock is always the innermost lock. Device code
//! takes its instance semaphore first and the store lock second, never
//! the other way around.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Selects one of the two per-device counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    /// Opens of the "current" device (minor 1)
    Current,
    /// Opens of the lookup device (minor 2)
    Pid,
}

/// Snapshot of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub current_count: u64,
    pub pid_count: u64,
    pub all_count: u64,
}

/// Shared counters, zeroed at creation
#[derive(Debug, Default)]
pub struct CounterStore {
    counts: Mutex<Counts>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the store lock
    pub fn lock(&self) -> CounterGuard<'_> {
        CounterGuard {
            counts: self.counts.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Locked copy of all three counters (no side effects)
    pub fn snapshot(&self) -> Counts {
        *self.lock().counts
    }

    pub fn current_count(&self) -> u64 {
        self.lock().counts.current_count
    }

    pub fn pid_count(&self) -> u64 {
        self.lock().counts.pid_count
    }
}

/// Exclusive access to the counters; the store lock is released on drop
pub struct CounterGuard<'a> {
    counts: MutexGuard<'a, Counts>,
}

impl CounterGuard<'_> {
    /// Bump the selected counter by one
    pub fn increment(&mut self, which: Counter) {
        let slot = self.slot(which);
        *slot = slot.saturating_add(1);
    }

    /// Zero the selected counter and the aggregate
    ///
    /// Any reset clears `all_count` too, regardless of which counter
    /// was targeted.
    pub fn reset(&mut self, which: Counter) {
        *self.slot(which) = 0;
        self.counts.all_count = 0;
    }

    /// Fold counters into `all_count` and return the new total
    ///
    /// This is NOT idempotent: each call adds again. With
    /// `Counter::Current` only `current_count` is added; with
    /// `Counter::Pid` both `pid_count` and `current_count` are.
    pub fn report_aggregate(&mut self, which: Counter) -> u64 {
        let delta = match which {
            Counter::Current => self.counts.current_count,
            Counter::Pid => self.counts.pid_count.saturating_add(self.counts.current_count),
        };
        self.counts.all_count = self.counts.all_count.saturating_add(delta);
        self.counts.all_count
    }

    pub fn counts(&self) -> Counts {
        *self.counts
    }

    fn slot(&mut self, which: Counter) -> &mut u64 {
        match which {
            Counter::Current => &mut self.counts.current_count,
            Counter::Pid => &mut self.counts.pid_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_starts_zeroed() {
        let store = CounterStore::new();
        assert_eq!(store.snapshot(), Counts::default());
    }

    #[test]
    fn test_increment_selects_counter() {
        let store = CounterStore::new();
        {
            let mut guard = store.lock();
            guard.increment(Counter::Current);
            guard.increment(Counter::Current);
            guard.increment(Counter::Pid);
        }
        assert_eq!(store.current_count(), 2);
        assert_eq!(store.pid_count(), 1);
        assert_eq!(store.snapshot().all_count, 0);
    }

    #[test]
    fn test_reset_clears_aggregate() {
        let store = CounterStore::new();
        let mut guard = store.lock();
        guard.increment(Counter::Current);
        guard.increment(Counter::Pid);
        guard.report_aggregate(Counter::Pid);
        assert_eq!(guard.counts().all_count, 2);

        guard.reset(Counter::Pid);
        let counts = guard.counts();
        assert_eq!(counts.pid_count, 0);
        assert_eq!(counts.current_count, 1);
        assert_eq!(counts.all_count, 0);
    }

    #[test]
    fn test_aggregate_accumulates() {
        let store = CounterStore::new();
        let mut guard = store.lock();
        for _ in 0..3 {
            guard.increment(Counter::Current);
        }
        guard.increment(Counter::Pid);

        assert_eq!(guard.report_aggregate(Counter::Pid), 4);
        assert_eq!(guard.report_aggregate(Counter::Pid), 8);
        assert_eq!(guard.report_aggregate(Counter::Current), 11);
    }

    #[test]
    fn test_aggregate_saturates() {
        let store = CounterStore::new();
        let mut guard = store.lock();
        guard.counts.all_count = u64::MAX - 1;
        guard.increment(Counter::Current);
        guard.increment(Counter::Current);
        assert_eq!(guard.report_aggregate(Counter::Current), u64::MAX);
    }

    #[test]
    fn test_concurrent_increments() {
        let store = Arc::new(CounterStore::new());
        let mut handles = vec![];

        for i in 0..4 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let which = if i % 2 == 0 { Counter::Current } else { Counter::Pid };
                for _ in 0..1000 {
                    store.lock().increment(which);
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.current_count(), 2000);
        assert_eq!(store.pid_count(), 2000);
    }
}
