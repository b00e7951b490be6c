//! # kernellab - counting and pid-lookup devices
//!
//! Two device instances share one set of counters:
//!
//! - **kernellab1** counts its opens into `current_count`.
//! - **kernellab2** counts its opens into `pid_count` and resolves pids to
//!   `{pid, comm, state}` when a [`KernellabMessage`] is written to it.
//!
//! A read-only attribute group publishes `current_count`, `pid_count` and
//! `all_count`. Reading `all_count` adds both counters into a running
//! total on every read.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use kernellab::{AddressSpace, CountAttribute, DeviceMinor, Kernellab, Session};
//!
//! let klab = Kernellab::builder().build()?;
//! let mm = Arc::new(AddressSpace::new());
//!
//! let file = klab.open(DeviceMinor::CURRENT, Session::current(mm))?;
//! print!("{}", klab.attributes().show(CountAttribute::CurrentCount)); // "1\n"
//! file.release();
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────┐   ┌────────────────────┐   ┌──────────────────┐
//! │ OpenFile (minor 1) │   │ OpenFile (minor 2) │   │ CountAttributes  │
//! │ read / ioctl       │   │ read / write/ioctl │   │ current/pid/all  │
//! └─────────┬──────────┘   └─────────┬──────────┘   └────────┬─────────┘
//!           │ instance sem           │ instance sem          │
//!           ▼                        ▼                       │
//! ┌──────────────────────────────────────────────────────────▼─────────┐
//! │                 CounterStore (store lock, innermost)               │
//! └────────────────────────────────────────────────────────────────────┘
//!                                    │ write on minor 2
//!                                    ▼
//!                          ProcessTable (own sync)
//! ```

// Re-export core types
pub use kernellab_core::{
    Counter,
    CounterStore,
    Counts,
    DeviceError,
    DeviceMinor,
    DeviceResult,
    Fault,
    InterruptToken,
    KernellabMessage,
    ModuleError,
    ModuleResult,
    NodeKind,
    NodeRegistry,
    PidInfo,
    ProcessTable,
    Session,
    TaskRecord,
    UserMemory,
    CommName,
    RESET,
    TASK_COMM_LEN,
    NR_DEVS,
};
pub use kernellab_core::pidinfo::task_state;

// Re-export kprint macros for logging
pub use kernellab_core::{kerror, kwarn, kinfo, kdebug, ktrace};
pub use kernellab_core::kprint::{LogLevel, init as init_logging, set_log_level};

// Re-export module types
pub use kernellab_module::{
    AddressSpace,
    CountAttribute,
    CountAttributes,
    Kernellab,
    KernellabBuilder,
    LookupOutcome,
    ModuleConfig,
    NodeTable,
    OpenFile,
    PlatformTable,
    StaticProcessTable,
};
