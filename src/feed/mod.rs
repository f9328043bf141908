pub mod metrics;
pub mod normalizer;
pub mod selection;
pub mod synchronizer;

pub use metrics::{chart_series, summarize, ChartPoint, SignalCounts};
pub use normalizer::normalize;
pub use selection::SelectionState;
pub use synchronizer::{FeedState, FeedSynchronizer, FeedTask, FETCH_ERROR_MESSAGE};
