// Path: crates/telemetry/src/time.rs
use std::time::Instant;

/// Logs the wall-clock duration of a scope when dropped.
pub struct ScopeTimer {
    label: &'static str,
    started: Instant,
}

impl ScopeTimer {
    /// Starts timing `label`.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            started: Instant::now(),
        }
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        tracing::debug!(
            scope = self.label,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "scope finished"
        );
    }
}
