use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::SignalSource;
use crate::feed::normalizer::normalize;
use crate::feed::selection::SelectionState;
use crate::models::Signal;

/// Shown to users on any fetch failure; the underlying cause only goes to
/// the logs.
pub const FETCH_ERROR_MESSAGE: &str = "Unable to fetch data from backend";

/// Snapshot of the feed handed to renderers. Stale signals are kept across
/// failed refreshes; an error banner plus old data beats a blank view.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub signals: Vec<Signal>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

struct FeedInner {
    state: FeedState,
    selection: SelectionState,
    // Fetch cycles are numbered at issue time; a completion applies only
    // if nothing newer has been applied. Overlapping cycles therefore
    // resolve latest-issued-wins and stale results are dropped.
    issued: u64,
    applied: u64,
    closed: bool,
}

/// Owns the canonical feed state and the refresh lifecycle. All mutation
/// happens here; everything else reads snapshots.
pub struct FeedSynchronizer {
    source: Arc<dyn SignalSource>,
    inner: Arc<RwLock<FeedInner>>,
    interval: Duration,
}

/// Handle to the background refresh loop returned by `start`. Dropping it
/// leaks the loop; call `stop` on teardown.
pub struct FeedTask {
    handle: JoinHandle<()>,
    inner: Arc<RwLock<FeedInner>>,
}

impl FeedTask {
    /// Cancels the timer and marks the feed closed so that any still
    /// in-flight completion becomes a no-op.
    pub async fn stop(self) {
        self.inner.write().await.closed = true;
        self.handle.abort();
    }
}

impl FeedSynchronizer {
    pub fn new(source: Arc<dyn SignalSource>, interval: Duration) -> Self {
        Self {
            source,
            inner: Arc::new(RwLock::new(FeedInner {
                state: FeedState::default(),
                selection: SelectionState::default(),
                issued: 0,
                applied: 0,
                closed: false,
            })),
            interval,
        }
    }

    /// Fires one fetch cycle immediately, then one per interval tick.
    /// Timer cycles are spawned rather than awaited so a slow response
    /// never delays the schedule; the issue-order guard keeps the state
    /// consistent when they overlap.
    pub fn start(self: &Arc<Self>) -> FeedTask {
        let sync = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sync.interval);
            loop {
                ticker.tick().await;
                let cycle = Arc::clone(&sync);
                tokio::spawn(async move { cycle.run_cycle().await });
            }
        });
        FeedTask {
            handle,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Manual refresh. Safe to call while another cycle is in flight.
    pub async fn refresh_now(&self) {
        self.run_cycle().await;
    }

    async fn run_cycle(&self) {
        let seq = {
            let mut inner = self.inner.write().await;
            if inner.closed {
                return;
            }
            inner.issued += 1;
            inner.state.loading = true;
            inner.issued
        };

        let result = self.source.latest_signals().await;

        let mut inner = self.inner.write().await;
        if inner.closed {
            return;
        }
        if seq <= inner.applied {
            debug!("Dropping superseded fetch cycle {}", seq);
            return;
        }
        inner.applied = seq;
        inner.state.loading = inner.issued > inner.applied;

        match result {
            Ok(payload) => {
                let batch = normalize(&payload);
                debug!("Fetched {} signals", batch.len());
                inner.selection.revalidate(&batch);
                inner.state.signals = batch;
                inner.state.error = None;
                inner.state.last_fetched_at = Some(Utc::now());
            }
            Err(err) => {
                warn!("Fetch cycle {} failed: {:#}", seq, err);
                inner.state.error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }
    }

    pub async fn state(&self) -> FeedState {
        self.inner.read().await.state.clone()
    }

    pub async fn select(&self, signal: &Signal) {
        self.inner.write().await.selection.select(signal);
    }

    pub async fn clear_selection(&self) {
        self.inner.write().await.selection.clear();
    }

    pub async fn selected(&self) -> Option<Signal> {
        let inner = self.inner.read().await;
        inner.selection.current(&inner.state.signals).cloned()
    }

    /// Detail lookup against the backend, normalized through the same
    /// pipeline as the feed.
    pub async fn fetch_signal(&self, id: &str) -> anyhow::Result<Option<Signal>> {
        let payload = self.source.signal_by_id(id).await?;
        Ok(normalize(&payload).into_iter().next())
    }
}
