//! Tool-Call Tracing
//!
//! Every tool invocation produces exactly one [`ToolCallRecord`], written to
//! an explicit channel rather than an observer callback. The dispatcher holds
//! the sending half; the caller drains the receiving half after the
//! completion returns. Records are append-only and owned by the completion
//! that produced them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// One tool invocation, as observed at the dispatch boundary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Tool that was invoked
    pub tool_name: String,

    /// Serialized arguments as passed to the tool
    pub arguments: String,

    /// Serialized result returned across the tool boundary
    pub result: String,

    /// When the invocation completed
    pub timestamp: DateTime<Utc>,
}

impl ToolCallRecord {
    pub fn new(
        tool_name: impl Into<String>,
        arguments: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: arguments.into(),
            result: result.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Sending half handed to the dispatcher
#[derive(Clone)]
pub struct TraceSink {
    tx: mpsc::UnboundedSender<ToolCallRecord>,
}

impl TraceSink {
    /// Record one invocation. Sending never blocks; a dropped drain side
    /// simply discards the record.
    pub fn record(&self, record: ToolCallRecord) {
        let _ = self.tx.send(record);
    }
}

/// Receiving half kept by the caller
pub struct TraceDrain {
    rx: mpsc::UnboundedReceiver<ToolCallRecord>,
}

impl TraceDrain {
    /// Collect all records produced so far, in invocation order.
    pub fn drain(&mut self) -> Vec<ToolCallRecord> {
        let mut records = Vec::new();
        while let Ok(record) = self.rx.try_recv() {
            records.push(record);
        }
        records
    }
}

/// Create a connected sink/drain pair for one completion's lifetime.
pub fn trace_channel() -> (TraceSink, TraceDrain) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TraceSink { tx }, TraceDrain { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_drain_in_order() {
        let (sink, mut drain) = trace_channel();

        sink.record(ToolCallRecord::new("a", "{}", "1"));
        sink.record(ToolCallRecord::new("b", "{}", "2"));

        let records = drain.drain();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tool_name, "a");
        assert_eq!(records[1].tool_name, "b");
    }

    #[test]
    fn test_empty_drain() {
        let (_sink, mut drain) = trace_channel();
        assert!(drain.drain().is_empty());
    }

    #[test]
    fn test_record_after_drain_dropped_is_discarded() {
        let (sink, drain) = trace_channel();
        drop(drain);
        // Must not panic or error
        sink.record(ToolCallRecord::new("a", "{}", "1"));
    }
}
