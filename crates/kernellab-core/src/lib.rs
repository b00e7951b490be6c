//! # kernellab-core
//!
//! Core types and traits for the kernellab device subsystem.
//!
//! This crate holds no device logic. It defines the shared Counter Store,
//! the per-device semaphore, the wire structures of the lookup protocol and
//! the collaborator traits that `kernellab-module` implements.
//!
//! ## Modules
//!
//! - `counters` - Counter Store and its lock guard
//! - `semaphore` - Binary semaphore with interruptible down
//! - `interrupt` - Per-session interrupt token
//! - `session` - Caller context passed into every device operation
//! - `minor` - Device minor numbers
//! - `pidinfo` - Lookup envelope, result struct, `RESET` code
//! - `traits` - User memory, process table and node registry boundaries
//! - `error` - Error types
//! - `kprint` - printk-style logging macros
//! - `env` - Environment variable utilities

pub mod counters;
pub mod semaphore;
pub mod interrupt;
pub mod session;
pub mod minor;
pub mod pidinfo;
pub mod traits;
pub mod error;
pub mod kprint;
pub mod env;

pub use counters::{Counter, CounterGuard, CounterStore, Counts};
pub use semaphore::{Semaphore, SemaphoreGuard};
pub use interrupt::InterruptToken;
pub use session::Session;
pub use minor::{DeviceMinor, NR_DEVS};
pub use pidinfo::{CommName, KernellabMessage, PidInfo, RESET, TASK_COMM_LEN};
pub use traits::{NodeKind, NodeRegistry, ProcessTable, TaskRecord, UserMemory};
pub use error::{DeviceError, DeviceResult, Fault, ModuleError, ModuleResult};
pub use env::{env_get, env_get_bool, env_get_millis, env_get_opt};
