//! Collaborator traits
//!
//! The devices depend only on these boundaries. Default implementations
//! live in `kernellab-module`.

use core::ops::ControlFlow;

use crate::error::Fault;
use crate::minor::DeviceMinor;

/// Caller-side memory reachable from a device operation
///
/// The `copy_to_user`/`copy_from_user` pair: either the whole range is
/// transferred or nothing is and a [`Fault`] comes back.
pub trait UserMemory: Send + Sync {
    /// Fill `dst` from caller memory starting at `addr`
    fn copy_from_user(&self, addr: u64, dst: &mut [u8]) -> Result<(), Fault>;

    /// Write `src` into caller memory starting at `addr`
    fn copy_to_user(&self, addr: u64, src: &[u8]) -> Result<(), Fault>;
}

/// One live process as seen by the process table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub pid: i32,
    pub comm: String,
    /// Numeric scheduling state, see `pidinfo::task_state`
    pub state: i64,
}

impl TaskRecord {
    pub fn new(pid: i32, comm: impl Into<String>, state: i64) -> Self {
        Self { pid, comm: comm.into(), state }
    }
}

/// Enumerates live processes
///
/// **Contract:**
/// - Iteration order is unspecified and pids may repeat.
/// - A scan is bounded and synchronizes itself. It must never call back
///   into a device or take a device or counter lock.
pub trait ProcessTable: Send + Sync {
    /// Visit processes until `visit` breaks or the table is exhausted
    fn for_each_process(&self, visit: &mut dyn FnMut(&TaskRecord) -> ControlFlow<()>);
}

/// What a registry entry stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Character device node for one instance
    CharDevice(DeviceMinor),
    /// Directory holding the count attributes
    AttributeGroup,
}

/// Publishes device nodes and the attribute directory
///
/// Stands in for device-node creation and the attribute tree. Only
/// success or failure of each step matters to start-up.
pub trait NodeRegistry: Send + Sync {
    /// Create `name`; on failure return a positive errno
    fn create(&self, kind: NodeKind, name: &str) -> Result<(), i32>;

    /// Remove `name`. Removing an unknown name is a no-op.
    fn destroy(&self, name: &str);
}
