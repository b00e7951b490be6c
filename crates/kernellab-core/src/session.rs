//! Caller session context
//!
//! Replaces ambient "current task" access: every device operation is
//! handed the session explicitly and reads the caller's pid, memory and
//! pending-interrupt state from it.

use std::sync::Arc;

use crate::interrupt::InterruptToken;
use crate::traits::UserMemory;

#[derive(Clone)]
pub struct Session {
    pid: i32,
    memory: Arc<dyn UserMemory>,
    interrupt: InterruptToken,
}

impl Session {
    pub fn new(pid: i32, memory: Arc<dyn UserMemory>) -> Self {
        Self {
            pid,
            memory,
            interrupt: InterruptToken::new(),
        }
    }

    /// Session for the calling process
    pub fn current(memory: Arc<dyn UserMemory>) -> Self {
        Self::new(nix::unistd::getpid().as_raw(), memory)
    }

    #[inline]
    pub fn pid(&self) -> i32 {
        self.pid
    }

    #[inline]
    pub fn memory(&self) -> &dyn UserMemory {
        &*self.memory
    }

    /// Token an interruptible wait of this session watches
    #[inline]
    pub fn interrupt(&self) -> &InterruptToken {
        &self.interrupt
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("pid", &self.pid)
            .field("interrupt", &self.interrupt)
            .finish()
    }
}
