//! Protocol diagnostics.
//!
//! Counters for every degraded path of the AT exchange. None of these
//! conditions is fatal (the stove simply retries), so instead of
//! surfacing them as errors the engine counts them here and the runtime
//! can publish the snapshot as a diagnostics sensor or log line.

use serde::{Deserialize, Serialize};

/// Cumulative protocol counters since boot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolStats {
    /// CR-terminated lines received (including empty ones).
    pub lines: u32,
    /// Partial lines discarded because they overran the line buffer.
    pub framer_overflows: u32,
    /// Status bodies truncated because they overran the body buffer.
    pub body_overflows: u32,
    /// `FAILURE:` reports from the stove.
    pub appliance_failures: u32,
    /// Status bodies that matched no known shape.
    pub unknown_replies: u32,
    /// AT lines answered with `ERROR`.
    pub unknown_commands: u32,
    /// Status bodies never terminated with Ctrl-Z in time.
    pub body_timeouts: u32,
    /// Status body waits aborted on request.
    pub body_cancels: u32,
    /// Commands handed to the stove via `AT+CMGR`.
    pub commands_delivered: u32,
    /// Commands acknowledged via `AT+CMGD`.
    pub commands_deleted: u32,
    /// Text of the most recent `FAILURE:` report.
    pub last_failure: Option<heapless::String<64>>,
}

impl ProtocolStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure report, keeping a truncated copy of its text.
    pub fn record_failure(&mut self, reason: &str) {
        self.appliance_failures = self.appliance_failures.wrapping_add(1);
        self.last_failure = Some(crate::config::fixed_str(reason));
    }

    /// Total degraded events of any kind.
    pub fn anomalies(&self) -> u32 {
        self.framer_overflows
            .wrapping_add(self.body_overflows)
            .wrapping_add(self.appliance_failures)
            .wrapping_add(self.unknown_replies)
            .wrapping_add(self.unknown_commands)
            .wrapping_add(self.body_timeouts)
    }

    /// Render the counters as a JSON document for diagnostics endpoints.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
