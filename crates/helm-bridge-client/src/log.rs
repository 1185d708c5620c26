//! Per-call log sinks
//!
//! Helm's debug output is handed to whichever sink the caller passed when the
//! client was built. Nothing here touches process-wide logging state.

use std::sync::{Arc, Mutex};

/// Destination for Helm debug lines
pub trait LogSink: Send + Sync {
    /// Receive one line of Helm output
    fn log(&self, line: &str);

    /// Whether Helm should be asked for debug output at all
    fn enabled(&self) -> bool {
        true
    }
}

/// Drops everything; Helm runs without `--debug`
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl LogSink for DiscardSink {
    fn log(&self, _line: &str) {}

    fn enabled(&self) -> bool {
        false
    }
}

/// Forwards lines to `tracing` at debug level under the `helm` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, line: &str) {
        tracing::debug!(target: "helm", "{}", line);
    }
}

/// Collects lines in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines received so far
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LogSink for MemorySink {
    fn log(&self, line: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(line.to_string()),
        }
    }
}

/// Sink matching the boundary's `suppress_output` flag
pub fn sink_for(suppress_output: bool) -> Arc<dyn LogSink> {
    if suppress_output {
        Arc::new(DiscardSink)
    } else {
        Arc::new(TracingSink)
    }
}
