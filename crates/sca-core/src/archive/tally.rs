//! Success/failure counters shared by all download tasks.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-run outcome counters. Each completed track increments exactly one
/// counter; increments are atomic so concurrent completions never collide.
#[derive(Debug, Default)]
pub struct RunTally {
    success: AtomicUsize,
    failure: AtomicUsize,
}

/// Plain copy of the counters at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallySnapshot {
    pub success: usize,
    pub failure: usize,
}

impl RunTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.success.fetch_add(1, Ordering::AcqRel);
    }

    pub fn record_failure(&self) {
        self.failure.fetch_add(1, Ordering::AcqRel);
    }

    pub fn snapshot(&self) -> TallySnapshot {
        TallySnapshot {
            success: self.success.load(Ordering::Acquire),
            failure: self.failure.load(Ordering::Acquire),
        }
    }
}

impl TallySnapshot {
    pub fn total(&self) -> usize {
        self.success + self.failure
    }

    /// Summary lines; a line is omitted when its count is zero.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.success > 0 {
            lines.push(format!("Downloaded {} track(s) successfully.", self.success));
        }
        if self.failure > 0 {
            lines.push(format!("Failed to download {} track(s).", self.failure));
        }
        lines
    }

    pub fn log_summary(&self) {
        for line in self.summary_lines() {
            tracing::info!("{}", line);
        }
    }
}
