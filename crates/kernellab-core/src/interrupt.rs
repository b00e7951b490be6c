//! Interrupt token: the "signal pending" flag of a session
//!
//! An interruptible wait ([`Semaphore::down_interruptible`]) polls the
//! token of the waiting session and gives up with
//! `DeviceError::Interrupted` once it is raised. Clones share state, so the
//! caller keeps one clone to raise while the session blocks on another.
//!
//! [`Semaphore::down_interruptible`]: crate::semaphore::Semaphore::down_interruptible

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{DeviceError, DeviceResult};

#[derive(Clone, Default)]
pub struct InterruptToken {
    pending: Arc<AtomicBool>,
}

impl InterruptToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an interrupt; every blocked wait on a clone of this token aborts
    pub fn raise(&self) {
        self.pending.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Acknowledge a delivered interrupt so the session can wait again
    pub fn clear(&self) {
        self.pending.store(false, Ordering::Release);
    }

    /// `Err(Interrupted)` if an interrupt is pending
    #[inline]
    pub fn check(&self) -> DeviceResult<()> {
        if self.is_pending() {
            Err(DeviceError::Interrupted)
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for InterruptToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterruptToken")
            .field("pending", &self.is_pending())
            .finish()
    }
}
