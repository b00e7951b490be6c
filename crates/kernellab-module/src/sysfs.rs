//! Read-only count attributes
//!
//! Three attributes live in the module's attribute directory, each read
//! as a decimal number followed by a newline:
//!
//! | Attribute       | Mode  | Read                                        |
//! |-----------------|-------|---------------------------------------------|
//! | `current_count` | 0440  | opens of device 1 since its last reset      |
//! | `pid_count`     | 0440  | opens of device 2 since its last reset      |
//! | `all_count`     | 0440  | **side effect**: adds both counts, then reads |
//!
//! Reading `all_count` is not idempotent. Every read folds the current
//! counts into the running total again, so two back-to-back reads with
//! no activity in between differ by `current_count + pid_count`.

use std::sync::Arc;

use kernellab_core::counters::{Counter, CounterStore};

/// Permission bits every attribute is published with
pub const ATTR_MODE: u32 = 0o440;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountAttribute {
    CurrentCount,
    PidCount,
    AllCount,
}

impl CountAttribute {
    /// Attributes in publication order
    pub const ALL: [CountAttribute; 3] = [
        CountAttribute::CurrentCount,
        CountAttribute::PidCount,
        CountAttribute::AllCount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CountAttribute::CurrentCount => "current_count",
            CountAttribute::PidCount => "pid_count",
            CountAttribute::AllCount => "all_count",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.name() == name)
    }

    pub fn mode(self) -> u32 {
        ATTR_MODE
    }
}

/// The attribute group, backed by the shared Counter Store
#[derive(Debug, Clone)]
pub struct CountAttributes {
    store: Arc<CounterStore>,
}

impl CountAttributes {
    pub fn new(store: Arc<CounterStore>) -> Self {
        Self { store }
    }

    /// Numeric value of `attr` (`AllCount` accumulates, see module docs)
    pub fn value(&self, attr: CountAttribute) -> u64 {
        match attr {
            CountAttribute::CurrentCount => self.store.current_count(),
            CountAttribute::PidCount => self.store.pid_count(),
            // The aggregate attribute folds both counters in
            CountAttribute::AllCount => self.store.lock().report_aggregate(Counter::Pid),
        }
    }

    /// Text the attribute reads as: the value and a newline
    pub fn show(&self, attr: CountAttribute) -> String {
        format!("{}\n", self.value(attr))
    }

    /// `show` by attribute name, `None` for unknown names
    pub fn show_by_name(&self, name: &str) -> Option<String> {
        CountAttribute::from_name(name).map(|attr| self.show(attr))
    }
}
