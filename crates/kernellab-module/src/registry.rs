//! `NodeTable`: default `NodeRegistry` implementation.
//!
//! Keeps published names in memory. An optional capacity makes creation
//! fail with `ENOSPC` once full, which is how start-up unwinding is
//! exercised.

use kernellab_core::traits::{NodeKind, NodeRegistry};

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct NodeTable {
    nodes: Mutex<BTreeMap<String, NodeKind>>,
    capacity: Option<usize>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table that refuses to hold more than `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Mutex::new(BTreeMap::new()),
            capacity: Some(capacity),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes().contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Option<NodeKind> {
        self.nodes().get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn nodes(&self) -> MutexGuard<'_, BTreeMap<String, NodeKind>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NodeRegistry for NodeTable {
    fn create(&self, kind: NodeKind, name: &str) -> Result<(), i32> {
        let mut nodes = self.nodes();
        if nodes.contains_key(name) {
            return Err(libc::EEXIST);
        }
        if self.capacity.is_some_and(|cap| nodes.len() >= cap) {
            return Err(libc::ENOSPC);
        }
        nodes.insert(name.to_string(), kind);
        Ok(())
    }

    fn destroy(&self, name: &str) {
        self.nodes().remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernellab_core::minor::DeviceMinor;

    #[test]
    fn test_create_destroy() {
        let table = NodeTable::new();
        table.create(NodeKind::CharDevice(DeviceMinor::CURRENT), "kernellab1").unwrap();
        assert_eq!(table.kind("kernellab1"), Some(NodeKind::CharDevice(DeviceMinor::CURRENT)));
        assert_eq!(table.create(NodeKind::AttributeGroup, "kernellab1"), Err(libc::EEXIST));

        table.destroy("kernellab1");
        table.destroy("kernellab1");
        assert!(table.is_empty());
    }

    #[test]
    fn test_capacity() {
        let table = NodeTable::with_capacity(1);
        table.create(NodeKind::AttributeGroup, "a").unwrap();
        assert_eq!(table.create(NodeKind::AttributeGroup, "b"), Err(libc::ENOSPC));
        assert_eq!(table.len(), 1);
        assert!(!table.contains("b"));
    }
}
