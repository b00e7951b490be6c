//! Wire structures shared with callers of the lookup device
//!
//! Layouts match the C header the user-side tools compile against:
//!
//! ```text
//! struct kernellab_message {          struct pid_info {
//!     int   pid;      // 0..4             int  pid;        // 0..4
//!     /* pad */       // 4..8             char comm[16];   // 4..20
//!     void *address;  // 8..16            /* pad */        // 20..24
//! };                                      long state;      // 24..32
//!                                     };
//! ```
//!
//! All integers are little-endian.

/// Size of a task's `comm` field, including the NUL terminator
pub const TASK_COMM_LEN: usize = 16;

const KERNELLAB_IOC_MAGIC: u8 = b'k';

/// `_IO('k', 0)`: zero the device's counter and the aggregate
pub const RESET: u32 = nix::request_code_none!(KERNELLAB_IOC_MAGIC, 0) as u32;

/// Numeric scheduling states as reported in `PidInfo::state`
pub mod task_state {
    pub const RUNNING: i64 = 0x0000;
    pub const INTERRUPTIBLE: i64 = 0x0001;
    pub const UNINTERRUPTIBLE: i64 = 0x0002;
    pub const STOPPED: i64 = 0x0004;
    pub const TRACED: i64 = 0x0008;
    pub const DEAD: i64 = 0x0010;
    pub const ZOMBIE: i64 = 0x0020;
    pub const PARKED: i64 = 0x0040;
    pub const IDLE: i64 = 0x0402;
}

/// NUL-terminated, fixed-size process name
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct CommName {
    bytes: [u8; TASK_COMM_LEN],
}

impl CommName {
    /// Copy `name` in, keeping at most `TASK_COMM_LEN - 1` bytes
    ///
    /// Cuts on a char boundary. The flag is true when anything was dropped.
    pub fn truncated(name: &str) -> (Self, bool) {
        let mut end = name.len().min(TASK_COMM_LEN - 1);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        let mut bytes = [0u8; TASK_COMM_LEN];
        bytes[..end].copy_from_slice(&name.as_bytes()[..end]);
        (Self { bytes }, end < name.len())
    }

    pub fn from_raw(bytes: [u8; TASK_COMM_LEN]) -> Self {
        Self { bytes }
    }

    /// Bytes up to the first NUL
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.bytes.iter().position(|&b| b == 0).unwrap_or(TASK_COMM_LEN);
        &self.bytes[..len]
    }

    /// Name as text, lossy if a foreign writer put non-UTF-8 bytes in
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    pub fn raw(&self) -> &[u8; TASK_COMM_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for CommName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

/// Lookup request written to the pid device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernellabMessage {
    /// pid to resolve
    pub pid: i32,
    /// Caller address that receives a `PidInfo`
    pub address: u64,
}

impl KernellabMessage {
    pub const SIZE: usize = 16;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.pid.to_le_bytes());
        out[8..16].copy_from_slice(&self.address.to_le_bytes());
        out
    }

    /// `None` unless `bytes` is exactly one envelope
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::SIZE {
            return None;
        }
        Some(Self {
            pid: i32::from_le_bytes(bytes[0..4].try_into().ok()?),
            address: u64::from_le_bytes(bytes[8..16].try_into().ok()?),
        })
    }
}

/// Process metadata returned by a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PidInfo {
    pub pid: i32,
    pub comm: CommName,
    pub state: i64,
}

impl PidInfo {
    pub const SIZE: usize = 32;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.pid.to_le_bytes());
        out[4..20].copy_from_slice(self.comm.raw());
        out[24..32].copy_from_slice(&self.state.to_le_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::SIZE {
            return None;
        }
        Some(Self {
            pid: i32::from_le_bytes(bytes[0..4].try_into().ok()?),
            comm: CommName::from_raw(bytes[4..20].try_into().ok()?),
            state: i64::from_le_bytes(bytes[24..32].try_into().ok()?),
        })
    }
}
