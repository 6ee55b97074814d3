//! Per-node runtime parameters

use super::limits::{MAX_TRIALS, SEQUENCE_MARGIN_MS, SEQUENCE_POLL_MS};

/// Parameters shared by both orchestrators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeConfig {
    /// Failed attempts before lockout
    pub max_trials: u8,
    /// Slack on top of a sequence's nominal duration
    pub sequence_margin_ms: u32,
    /// Completion poll interval
    pub sequence_poll_ms: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            max_trials: MAX_TRIALS,
            sequence_margin_ms: SEQUENCE_MARGIN_MS,
            sequence_poll_ms: SEQUENCE_POLL_MS,
        }
    }
}
