//! Device instances and their file operations
//!
//! A [`DeviceInstance`] exists for each minor from start-up to shutdown.
//! Opening it yields an [`OpenFile`] bound to the caller's [`Session`];
//! read/write/ioctl go through that handle and dropping it is close.
//!
//! Every operation runs under the instance semaphore. Counter updates
//! additionally take the store lock, always second.

use std::sync::Arc;
use std::time::Duration;

use kernellab_core::counters::CounterStore;
use kernellab_core::error::{DeviceError, DeviceResult};
use kernellab_core::minor::DeviceMinor;
use kernellab_core::pidinfo::RESET;
use kernellab_core::semaphore::Semaphore;
use kernellab_core::session::Session;
use kernellab_core::traits::ProcessTable;
use kernellab_core::{kdebug, kinfo};

use crate::lookup::{self, LookupOutcome};

pub struct DeviceInstance {
    minor: DeviceMinor,
    sem: Semaphore,
    store: Arc<CounterStore>,
    table: Arc<dyn ProcessTable>,
}

impl DeviceInstance {
    pub fn new(
        minor: DeviceMinor,
        store: Arc<CounterStore>,
        table: Arc<dyn ProcessTable>,
        interrupt_poll: Duration,
    ) -> Self {
        Self {
            minor,
            sem: Semaphore::with_poll(interrupt_poll),
            store,
            table,
        }
    }

    #[inline]
    pub fn minor(&self) -> DeviceMinor {
        self.minor
    }

    /// Count the open and bind the device to `session`
    ///
    /// Waits interruptibly for the instance semaphore. If the session's
    /// interrupt token is raised first, fails with `Interrupted` and no
    /// counter changes.
    pub fn open(self: &Arc<Self>, session: Session) -> DeviceResult<OpenFile> {
        kinfo!("kernellab: open({})", self.minor);

        {
            let _sem = self.sem.down_interruptible(session.interrupt())?;
            self.store.lock().increment(self.minor.counter());
        }

        Ok(OpenFile {
            dev: Arc::clone(self),
            session,
        })
    }
}

impl std::fmt::Debug for DeviceInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceInstance")
            .field("minor", &self.minor)
            .field("sem", &self.sem)
            .finish()
    }
}

/// An open device bound to one session; dropping it closes the device
#[derive(Debug)]
pub struct OpenFile {
    dev: Arc<DeviceInstance>,
    session: Session,
}

impl OpenFile {
    #[inline]
    pub fn minor(&self) -> DeviceMinor {
        self.dev.minor
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Copy the caller's pid (4 bytes, little-endian) to `buf`
    ///
    /// Returns the number of bytes transferred. A buffer with room for
    /// fewer than 4 bytes, or one the caller cannot write, is a
    /// `TransferFault`.
    pub fn read(&self, buf: u64, count: usize) -> DeviceResult<usize> {
        kinfo!("kernellab: read({})", self.dev.minor);

        let pid = self.session.pid().to_le_bytes();
        if count < pid.len() {
            return Err(DeviceError::TransferFault);
        }

        let _sem = self.dev.sem.down();
        self.session
            .memory()
            .copy_to_user(buf, &pid)
            .map_err(|_| DeviceError::TransferFault)?;
        Ok(pid.len())
    }

    /// Serve a lookup request of `count` bytes at `buf`
    ///
    /// Only the pid device performs lookups. On the current device this
    /// is a successful no-op returning `LookupOutcome::Ignored`. Lookups
    /// never touch the counters.
    pub fn write(&self, buf: u64, count: usize) -> DeviceResult<LookupOutcome> {
        kinfo!("kernellab: write({})", self.dev.minor);

        if !self.dev.minor.serves_lookup() {
            return Ok(LookupOutcome::Ignored);
        }

        let _sem = self.dev.sem.down();
        lookup::serve(&self.session, &*self.dev.table, buf, count)
    }

    /// Handle a control command
    ///
    /// `RESET` zeroes this device's counter and `all_count`; any other
    /// command changes nothing. Either way the reply is
    /// `Err(UnsupportedOperation)`: existing callers expect "not handled"
    /// from this device and treat reset as advisory. Read the counters
    /// to observe the effect.
    pub fn ioctl(&self, cmd: u32) -> DeviceResult<()> {
        kinfo!("kernellab: ioctl({})", self.dev.minor);

        let _sem = self.dev.sem.down();
        if cmd == RESET {
            self.dev.store.lock().reset(self.dev.minor.counter());
        } else {
            kdebug!("kernellab: ioctl({}) ignoring command {:#x}", self.dev.minor, cmd);
        }
        Err(DeviceError::UnsupportedOperation)
    }

    /// Close the device. Always succeeds, never touches the counters.
    pub fn release(self) {}
}

impl Drop for OpenFile {
    fn drop(&mut self) {
        kinfo!("kernellab: close({})", self.dev.minor);
    }
}
