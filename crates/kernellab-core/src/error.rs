//! Error types for the kernellab devices

use core::fmt;

/// Result type for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Result type for module start-up
pub type ModuleResult<T> = Result<T, ModuleError>;

/// Kernel's "ioctl command not handled" code. Not exported by libc.
pub const ENOIOCTLCMD: i32 = 515;

/// Errors a single device operation can report
///
/// All of these are local to the failing operation. Shared counters are
/// never left half-updated because every mutation holds its lock for the
/// whole critical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// Lock wait was aborted by an interrupt
    Interrupted,

    /// Malformed request envelope or unreachable embedded reference
    InvalidRequest,

    /// Copy across the user/device boundary failed
    TransferFault,

    /// Command not handled by the device
    UnsupportedOperation,
}

impl DeviceError {
    /// Negative errno the way a file operation would return it
    pub fn errno(&self) -> i32 {
        match self {
            DeviceError::Interrupted => -libc::EINTR,
            DeviceError::InvalidRequest => -libc::EINVAL,
            DeviceError::TransferFault => -libc::EFAULT,
            DeviceError::UnsupportedOperation => -ENOIOCTLCMD,
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Interrupted => write!(f, "interrupted while waiting for device"),
            DeviceError::InvalidRequest => write!(f, "invalid request"),
            DeviceError::TransferFault => write!(f, "transfer fault"),
            DeviceError::UnsupportedOperation => write!(f, "operation not handled"),
        }
    }
}

impl std::error::Error for DeviceError {}

/// A user-memory access that could not be satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    /// First address of the failed access
    pub addr: u64,
    /// Length of the failed access
    pub len: usize,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad user access at {:#x} (+{})", self.addr, self.len)
    }
}

impl std::error::Error for Fault {}

/// Errors raised while bringing the subsystem up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// Configuration rejected by `validate()`
    InvalidConfig(&'static str),

    /// A device node or attribute directory could not be created
    Registration {
        name: String,
        errno: i32,
    },
}

impl fmt::Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleError::InvalidConfig(why) => write!(f, "invalid config: {}", why),
            ModuleError::Registration { name, errno } => {
                write!(f, "failed to register {}: errno {}", name, errno)
            }
        }
    }
}

impl std::error::Error for ModuleError {}
