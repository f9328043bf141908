pub mod signal;
pub mod stats;

pub use signal::{Direction, Numeric, Signal, SignalId, Status, Timestamp};
pub use stats::SignalStats;
