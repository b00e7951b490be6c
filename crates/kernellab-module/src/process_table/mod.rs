//! Process-table collaborators
//!
//! - `StaticProcessTable`: in-memory records, insertion order, duplicates
//!   allowed. Used by tests and by embedders that own their process model.
//! - `PlatformTable`: the host's live processes. On Linux this scans
//!   `/proc`; elsewhere it is an empty table.

mod static_table;

pub use static_table::StaticProcessTable;

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod procfs_linux;
        pub use procfs_linux::ProcfsTable as PlatformTable;
    } else {
        mod fallback;
        pub use fallback::EmptyTable as PlatformTable;
    }
}

use kernellab_core::traits::ProcessTable;

/// Create the platform-appropriate process table
pub fn new_process_table() -> Box<dyn ProcessTable> {
    Box::new(PlatformTable::new())
}
