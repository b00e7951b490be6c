//! Binary semaphore guarding one device instance
//!
//! Mirrors the kernel's `down`/`down_interruptible`/`up` trio. The
//! semaphore protects a sequence of operations rather than a value, so
//! the guard carries no data; dropping it is `up`.
//!
//! Blocked waiters sleep on a condvar. An interruptible wait wakes every
//! `poll` interval to check its [`InterruptToken`], so an interrupt is
//! noticed within one interval even if nobody releases the semaphore.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::{DeviceError, DeviceResult};
use crate::interrupt::InterruptToken;

/// Default re-check interval for interruptible waits
pub const DEFAULT_POLL: Duration = Duration::from_millis(5);

pub struct Semaphore {
    /// true while held
    held: Mutex<bool>,
    released: Condvar,
    poll: Duration,
}

impl Semaphore {
    /// Semaphore with count 1, i.e. `sema_init(&sem, 1)`
    pub fn new() -> Self {
        Self::with_poll(DEFAULT_POLL)
    }

    pub fn with_poll(poll: Duration) -> Self {
        Self {
            held: Mutex::new(false),
            released: Condvar::new(),
            poll,
        }
    }

    /// Uninterruptible acquire
    pub fn down(&self) -> SemaphoreGuard<'_> {
        let mut held = self.state();
        while *held {
            held = self.released.wait(held).unwrap_or_else(PoisonError::into_inner);
        }
        *held = true;
        SemaphoreGuard { sem: self }
    }

    /// Acquire unless `interrupt` is raised first
    ///
    /// A token that is already pending fails immediately, before any
    /// attempt to take the semaphore.
    pub fn down_interruptible(&self, interrupt: &InterruptToken) -> DeviceResult<SemaphoreGuard<'_>> {
        interrupt.check()?;
        let mut held = self.state();
        while *held {
            let (guard, _) = self
                .released
                .wait_timeout(held, self.poll)
                .unwrap_or_else(PoisonError::into_inner);
            held = guard;
            if interrupt.is_pending() {
                if !*held {
                    // We may have consumed the release meant for another waiter
                    self.released.notify_one();
                }
                return Err(DeviceError::Interrupted);
            }
        }
        *held = true;
        Ok(SemaphoreGuard { sem: self })
    }

    /// Acquire without blocking
    pub fn try_down(&self) -> Option<SemaphoreGuard<'_>> {
        let mut held = self.state();
        if *held {
            return None;
        }
        *held = true;
        Some(SemaphoreGuard { sem: self })
    }

    pub fn is_held(&self) -> bool {
        *self.state()
    }

    fn up(&self) {
        *self.state() = false;
        self.released.notify_one();
    }

    fn state(&self) -> MutexGuard<'_, bool> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Semaphore")
            .field("held", &self.is_held())
            .finish()
    }
}

/// Holds the semaphore; dropping it is `up`
pub struct SemaphoreGuard<'a> {
    sem: &'a Semaphore,
}

impl Drop for SemaphoreGuard<'_> {
    fn drop(&mut self) {
        self.sem.up();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_down_up() {
        let sem = Semaphore::new();
        {
            let _guard = sem.down();
            assert!(sem.is_held());
            assert!(sem.try_down().is_none());
        }
        assert!(!sem.is_held());
        assert!(sem.try_down().is_some());
    }

    #[test]
    fn test_pending_interrupt_fails_fast() {
        let sem = Semaphore::new();
        let token = InterruptToken::new();
        token.raise();

        assert!(matches!(sem.down_interruptible(&token), Err(DeviceError::Interrupted)));
        assert!(!sem.is_held());
    }

    #[test]
    fn test_interrupt_while_blocked() {
        let sem = Arc::new(Semaphore::with_poll(Duration::from_millis(1)));
        let token = InterruptToken::new();
        let holder = sem.down();

        let sem2 = Arc::clone(&sem);
        let token2 = token.clone();
        let waiter = thread::spawn(move || {
            let result = sem2.down_interruptible(&token2).map(drop);
            result
        });

        thread::sleep(Duration::from_millis(20));
        let start = Instant::now();
        token.raise();

        assert_eq!(waiter.join().unwrap(), Err(DeviceError::Interrupted));
        assert!(start.elapsed() < Duration::from_secs(1));
        // The holder is unaffected by the aborted waiter
        assert!(sem.is_held());
        drop(holder);
        assert!(!sem.is_held());
    }

    #[test]
    fn test_blocked_waiter_acquires_after_release() {
        let sem = Arc::new(Semaphore::new());
        let token = InterruptToken::new();
        let holder = sem.down();

        let sem2 = Arc::clone(&sem);
        let waiter = thread::spawn(move || {
            let acquired = sem2.down_interruptible(&token).is_ok();
            acquired
        });

        thread::sleep(Duration::from_millis(20));
        drop(holder);
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn test_mutual_exclusion() {
        let sem = Arc::new(Semaphore::new());
        let inside = Arc::new(AtomicU32::new(0));
        let mut handles = vec![];

        for _ in 0..4 {
            let sem = Arc::clone(&sem);
            let inside = Arc::clone(&inside);
            handles.push(thread::spawn(move || {
                for _ in 0..500 {
                    let _guard = sem.down();
                    assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                    inside.fetch_sub(1, Ordering::SeqCst);
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }
    }
}
