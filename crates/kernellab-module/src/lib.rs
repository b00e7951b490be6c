//! # kernellab-module: Default implementations
//!
//! The devices, the lookup protocol, the attribute group and the default
//! collaborators behind the traits in `kernellab-core`.
//!
//! ## Default stack
//!
//! | Trait          | Default Impl         | Alternative                  |
//! |----------------|----------------------|------------------------------|
//! | ProcessTable   | ProcfsTable (Linux)  | StaticProcessTable, EmptyTable |
//! | UserMemory     | AddressSpace         | any caller-provided impl     |
//! | NodeRegistry   | NodeTable            | any caller-provided impl     |

pub mod config;
pub mod device;
pub mod lookup;
pub mod sysfs;
pub mod address_space;
pub mod process_table;
pub mod registry;
pub mod instance;

pub use config::ModuleConfig;
pub use device::{DeviceInstance, OpenFile};
pub use lookup::LookupOutcome;
pub use sysfs::{CountAttribute, CountAttributes};
pub use address_space::AddressSpace;
pub use process_table::{new_process_table, PlatformTable, StaticProcessTable};
pub use registry::NodeTable;
pub use instance::{Kernellab, KernellabBuilder};
