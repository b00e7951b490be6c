//! In-memory process table

use kernellab_core::traits::{ProcessTable, TaskRecord};

use core::ops::ControlFlow;
use std::sync::{PoisonError, RwLock};

/// Records in insertion order
///
/// A scan holds the read lock for its duration; inserts wait for it.
#[derive(Debug, Default)]
pub struct StaticProcessTable {
    tasks: RwLock<Vec<TaskRecord>>,
}

impl StaticProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: impl IntoIterator<Item = TaskRecord>) -> Self {
        Self {
            tasks: RwLock::new(tasks.into_iter().collect()),
        }
    }

    /// Append a record; an existing record with the same pid is kept
    pub fn insert(&self, task: TaskRecord) {
        self.tasks.write().unwrap_or_else(PoisonError::into_inner).push(task);
    }

    /// Drop every record for `pid`, returning how many were removed
    pub fn remove(&self, pid: i32) -> usize {
        let mut tasks = self.tasks.write().unwrap_or_else(PoisonError::into_inner);
        let before = tasks.len();
        tasks.retain(|t| t.pid != pid);
        before - tasks.len()
    }

    pub fn len(&self) -> usize {
        self.tasks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProcessTable for StaticProcessTable {
    fn for_each_process(&self, visit: &mut dyn FnMut(&TaskRecord) -> ControlFlow<()>) {
        let tasks = self.tasks.read().unwrap_or_else(PoisonError::into_inner);
        for task in tasks.iter() {
            if visit(task).is_break() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pids(table: &StaticProcessTable) -> Vec<i32> {
        let mut out = vec![];
        table.for_each_process(&mut |t| {
            out.push(t.pid);
            ControlFlow::Continue(())
        });
        out
    }

    #[test]
    fn test_insert_order_and_duplicates() {
        let table = StaticProcessTable::new();
        assert!(table.is_empty());
        table.insert(TaskRecord::new(3, "c", 0));
        table.insert(TaskRecord::new(1, "a", 0));
        table.insert(TaskRecord::new(3, "c2", 1));
        assert_eq!(pids(&table), vec![3, 1, 3]);

        assert_eq!(table.remove(3), 2);
        assert_eq!(pids(&table), vec![1]);
    }

    #[test]
    fn test_break_stops_scan() {
        let table = StaticProcessTable::with_tasks((1..=10).map(|p| TaskRecord::new(p, "t", 0)));
        let mut seen = 0;
        table.for_each_process(&mut |t| {
            seen += 1;
            if t.pid == 4 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(seen, 4);
    }
}
