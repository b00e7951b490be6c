//! Lookup protocol served by writes to the pid device
//!
//! ```text
//! caller                          device (semaphore held throughout)
//!   │ write(buf, 16)                │
//!   │──────────────────────────────▶│ copy envelope {pid, address}    ─ InvalidRequest
//!   │                               │ probe address for a PidInfo     ─ InvalidRequest
//!   │                               │ scan process table, first match
//!   │◀──────────────────────────────│ copy PidInfo to address         ─ TransferFault
//!   │        Found / NotFound       │
//! ```
//!
//! A miss leaves the caller's buffer untouched and is reported as
//! `LookupOutcome::NotFound`, never as a stale struct.

use core::ops::ControlFlow;

use kernellab_core::error::{DeviceError, DeviceResult};
use kernellab_core::pidinfo::{CommName, KernellabMessage, PidInfo};
use kernellab_core::session::Session;
use kernellab_core::traits::ProcessTable;
use kernellab_core::{kdebug, kwarn};

/// Result of one write to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The device does not serve lookups; nothing happened
    Ignored,
    /// The record was written to the caller's address
    Found {
        info: PidInfo,
        /// The process name did not fit and was cut
        name_truncated: bool,
    },
    /// No process has the requested pid; the caller's buffer is untouched
    NotFound { pid: i32 },
}

/// First record in `table` whose pid equals `pid`
///
/// Returns the metadata and whether the name was truncated.
pub fn find_first(table: &dyn ProcessTable, pid: i32) -> Option<(PidInfo, bool)> {
    let mut hit = None;
    table.for_each_process(&mut |task| {
        if task.pid != pid {
            return ControlFlow::Continue(());
        }
        let (comm, truncated) = CommName::truncated(&task.comm);
        hit = Some((PidInfo { pid: task.pid, comm, state: task.state }, truncated));
        ControlFlow::Break(())
    });
    hit
}

/// Run one lookup for `session`; `buf`/`count` describe the envelope
pub(crate) fn serve(
    session: &Session,
    table: &dyn ProcessTable,
    buf: u64,
    count: usize,
) -> DeviceResult<LookupOutcome> {
    if count != KernellabMessage::SIZE {
        return Err(DeviceError::InvalidRequest);
    }
    let memory = session.memory();

    let mut raw = [0u8; KernellabMessage::SIZE];
    memory
        .copy_from_user(buf, &mut raw)
        .map_err(|_| DeviceError::InvalidRequest)?;
    let message = KernellabMessage::decode(&raw).ok_or(DeviceError::InvalidRequest)?;

    // The output reference must be readable before we scan
    let mut probe = [0u8; PidInfo::SIZE];
    memory
        .copy_from_user(message.address, &mut probe)
        .map_err(|_| DeviceError::InvalidRequest)?;

    let Some((info, name_truncated)) = find_first(table, message.pid) else {
        kdebug!("kernellab: pid {} not found", message.pid);
        return Ok(LookupOutcome::NotFound { pid: message.pid });
    };
    if name_truncated {
        kwarn!("kernellab: comm of pid {} truncated to {:?}", info.pid, info.comm);
    }

    memory
        .copy_to_user(message.address, &info.to_bytes())
        .map_err(|_| DeviceError::TransferFault)?;
    Ok(LookupOutcome::Found { info, name_truncated })
}
