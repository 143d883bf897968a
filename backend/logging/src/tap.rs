//! Profiling taps: where calls are mirrored while profiling is on.

use std::sync::{Mutex, PoisonError};

pub trait ProfilingTap: Send + Sync {
    fn capture(&self, line: &str);
}

/// Forwards tap lines to `tracing` under the `daylog::profiling` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTap;

impl ProfilingTap for TracingTap {
    fn capture(&self, line: &str) {
        tracing::debug!(target: "daylog::profiling", "{line}");
    }
}

/// Keeps tap lines in memory.
#[derive(Debug, Default)]
pub struct MemoryTap {
    lines: Mutex<Vec<String>>,
}

impl MemoryTap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl ProfilingTap for MemoryTap {
    fn capture(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}
