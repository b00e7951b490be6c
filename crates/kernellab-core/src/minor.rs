//! Device minor numbers

use core::fmt;

use crate::counters::Counter;

/// Number of device instances created at start-up
pub const NR_DEVS: usize = 2;

/// Identity of one device instance
///
/// Minors are 1-based: `1` is the counting device, `2` the pid-lookup
/// device. They index the fixed device arena built at start-up.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DeviceMinor(u32);

impl DeviceMinor {
    /// The "current" device: counts into `current_count`
    pub const CURRENT: DeviceMinor = DeviceMinor(1);

    /// The lookup device: counts into `pid_count`, serves pid lookups
    pub const PID: DeviceMinor = DeviceMinor(2);

    /// All minors in arena order
    pub const ALL: [DeviceMinor; NR_DEVS] = [DeviceMinor::CURRENT, DeviceMinor::PID];

    /// Minor for a raw number, `None` if no such device exists
    #[inline]
    pub const fn new(minor: u32) -> Option<Self> {
        if minor >= 1 && minor as usize <= NR_DEVS {
            Some(DeviceMinor(minor))
        } else {
            None
        }
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Position in the device arena
    #[inline]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Which counter an open or reset of this device touches
    #[inline]
    pub const fn counter(self) -> Counter {
        if self.0 == 1 {
            Counter::Current
        } else {
            Counter::Pid
        }
    }

    /// Only the pid device performs lookups on write
    #[inline]
    pub const fn serves_lookup(self) -> bool {
        self.0 == 2
    }

    /// Node name under `prefix`, e.g. `kernellab1`
    pub fn node_name(self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }
}

impl fmt::Debug for DeviceMinor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceMinor({})", self.0)
    }
}

impl fmt::Display for DeviceMinor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
