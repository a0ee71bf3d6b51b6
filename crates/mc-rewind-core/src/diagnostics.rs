//! Where rewrite warnings go.
//!
//! Library code never logs table misses or dropped entries directly; it goes
//! through a [`DiagnosticsSink`] handed to the protocol at construction so
//! tests can assert on the exact warnings produced.

use std::sync::{Mutex, PoisonError};

use tracing::warn;

pub trait DiagnosticsSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards to `tracing::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn warn(&self, message: &str) {
        warn!(target: "mc_rewind", "{message}");
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for RecordingSink {
    fn warn(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        assert!(sink.is_empty());
        sink.warn("first");
        sink.warn("second");
        assert_eq!(sink.messages(), vec!["first", "second"]);
    }
}
