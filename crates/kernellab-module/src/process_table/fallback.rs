//! Empty process table for platforms without procfs
//!
//! Every lookup against it reports "not found".

use kernellab_core::traits::{ProcessTable, TaskRecord};

use core::ops::ControlFlow;

#[derive(Debug, Default)]
pub struct EmptyTable;

impl EmptyTable {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTable for EmptyTable {
    fn for_each_process(&self, _visit: &mut dyn FnMut(&TaskRecord) -> ControlFlow<()>) {}
}
