//! Linux process table backed by procfs
//!
//! Each scan walks the numeric entries of `/proc` and reads
//! `/proc/<pid>/stat`. Processes that exit mid-scan are skipped. procfs
//! needs no locking of ours, so the scan is safe to run while a device
//! semaphore is held.

use kernellab_core::pidinfo::task_state;
use kernellab_core::traits::{ProcessTable, TaskRecord};

use core::ops::ControlFlow;
use std::path::PathBuf;

pub struct ProcfsTable {
    root: PathBuf,
}

impl ProcfsTable {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Scan a procfs mounted somewhere other than `/proc`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_task(&self, pid: i32) -> Option<TaskRecord> {
        let stat = std::fs::read_to_string(self.root.join(pid.to_string()).join("stat")).ok()?;
        parse_stat(&stat)
    }
}

impl Default for ProcfsTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for ProcfsTable {
    fn for_each_process(&self, visit: &mut dyn FnMut(&TaskRecord) -> ControlFlow<()>) {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                kernellab_core::kwarn!("kernellab: cannot scan {}: {}", self.root.display(), e);
                return;
            }
        };

        for entry in entries.flatten() {
            let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<i32>().ok()) else {
                continue;
            };
            if let Some(task) = self.read_task(pid) {
                if visit(&task).is_break() {
                    return;
                }
            }
        }
    }
}

/// Parse `pid (comm) S ...`
///
/// `comm` may itself contain spaces and parentheses, so it runs from the
/// first `(` to the last `)`.
fn parse_stat(stat: &str) -> Option<TaskRecord> {
    let open = stat.find('(')?;
    let close = stat.rfind(')')?;
    if close < open {
        return None;
    }
    let pid = stat[..open].trim().parse().ok()?;
    let comm = &stat[open + 1..close];
    let state = stat[close + 1..].trim_start().chars().next()?;
    Some(TaskRecord::new(pid, comm, state_from_letter(state)))
}

fn state_from_letter(letter: char) -> i64 {
    match letter {
        'R' => task_state::RUNNING,
        'S' => task_state::INTERRUPTIBLE,
        'D' => task_state::UNINTERRUPTIBLE,
        'T' => task_state::STOPPED,
        't' => task_state::TRACED,
        'X' | 'x' => task_state::DEAD,
        'Z' => task_state::ZOMBIE,
        'P' => task_state::PARKED,
        'I' => task_state::IDLE,
        _ => task_state::RUNNING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stat() {
        let task = parse_stat("42 (worker) S 1 42 42 0 -1 4194560").unwrap();
        assert_eq!(task, TaskRecord::new(42, "worker", task_state::INTERRUPTIBLE));
    }

    #[test]
    fn test_parse_stat_odd_comm() {
        let task = parse_stat("7 (a) b (c)) R 1 7").unwrap();
        assert_eq!(task.comm, "a) b (c)");
        assert_eq!(task.state, task_state::RUNNING);

        let task = parse_stat("9 (kworker/0:1) I 2").unwrap();
        assert_eq!(task.state, task_state::IDLE);
    }

    #[test]
    fn test_parse_stat_garbage() {
        assert!(parse_stat("").is_none());
        assert!(parse_stat("x (y) R").is_none());
        assert!(parse_stat("1 )(").is_none());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let table = ProcfsTable::with_root("/nonexistent/kernellab-proc");
        let mut seen = 0;
        table.for_each_process(&mut |_| {
            seen += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(seen, 0);
    }

    #[test]
    fn test_reads_own_stat() {
        let me = std::process::id() as i32;
        let task = ProcfsTable::new().read_task(me).unwrap();
        assert_eq!(task.pid, me);
        assert!(!task.comm.is_empty());
    }
}
