use serde::{Deserialize, Serialize};

/// Aggregate counts reported by the backend's stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalStats {
    pub total_signals: u64,
    pub active_signals: u64,
}
