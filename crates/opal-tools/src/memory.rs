//! Memory snapshots for solve instrumentation.

use std::time::Instant;
use sysinfo::System;

/// A snapshot of this process's memory state at a point in time.
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    /// Resident set size in bytes
    pub rss_bytes: u64,
    /// Timestamp when this snapshot was captured
    pub timestamp: Instant,
    /// Name of the stage (e.g., "solve_start", "solve_end")
    pub stage: String,
}

/// Errors produced by memory instrumentation.
#[derive(Debug, Clone)]
pub enum MemoryError {
    ProcessNotFound { pid: u32 },
}

impl std::fmt::Display for MemoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryError::ProcessNotFound { pid } => {
                write!(f, "failed to locate process {}", pid)
            }
        }
    }
}

impl std::error::Error for MemoryError {}

impl MemorySnapshot {
    /// Capture current memory state for a given stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the current process cannot be located.
    pub fn capture(stage: &str) -> Result<Self, MemoryError> {
        let pid = sysinfo::Pid::from(std::process::id() as usize);

        // Only refresh the one process we care about.
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            sysinfo::ProcessesToUpdate::Some(&[pid]),
            true,
            sysinfo::ProcessRefreshKind::nothing().with_memory(),
        );

        let process = sys.process(pid).ok_or(MemoryError::ProcessNotFound {
            pid: std::process::id(),
        })?;

        Ok(MemorySnapshot {
            rss_bytes: process.memory(),
            timestamp: Instant::now(),
            stage: stage.to_string(),
        })
    }

    /// RSS difference against an earlier snapshot (positive means growth).
    pub fn diff(&self, other: &Self) -> i64 {
        self.rss_bytes as i64 - other.rss_bytes as i64
    }
}
