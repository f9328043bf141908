use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use tokio::sync::{oneshot, Mutex};

use futures_portal::api::SignalSource;
use futures_portal::models::SignalStats;

/// A mock backend that serves a scripted sequence of responses, one per
/// fetch. `Err` entries simulate transport failures.
pub struct MockSource {
    responses: Mutex<VecDeque<Result<Value, String>>>,
    by_id: Option<Value>,
    stats: SignalStats,
}

impl MockSource {
    pub fn new(responses: Vec<Result<Value, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            by_id: None,
            stats: SignalStats {
                total_signals: 0,
                active_signals: 0,
            },
        }
    }

    pub fn with_detail(mut self, record: Value) -> Self {
        self.by_id = Some(record);
        self
    }

    pub fn with_stats(mut self, stats: SignalStats) -> Self {
        self.stats = stats;
        self
    }
}

#[async_trait]
impl SignalSource for MockSource {
    async fn latest_signals(&self) -> Result<Value> {
        let next = self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err("script exhausted".to_string()));
        next.map_err(|msg| anyhow!(msg))
    }

    async fn signal_stats(&self) -> Result<SignalStats> {
        Ok(self.stats)
    }

    async fn signal_by_id(&self, _id: &str) -> Result<Value> {
        self.by_id
            .clone()
            .ok_or_else(|| anyhow!("no detail record configured"))
    }

    async fn push_signal(&self, body: &Value) -> Result<Value> {
        Ok(body.clone())
    }
}

/// A mock backend where each fetch blocks until its gate is released,
/// letting tests interleave overlapping cycles deterministically. Gates
/// are consumed in call order.
pub struct GatedSource {
    calls: Mutex<VecDeque<(oneshot::Receiver<()>, Result<Value, String>)>>,
}

impl GatedSource {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(VecDeque::new()),
        }
    }

    /// Queues a response for the next unclaimed fetch; returns the handle
    /// that releases it.
    pub async fn stage(&self, response: Result<Value, String>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().await.push_back((rx, response));
        tx
    }
}

#[async_trait]
impl SignalSource for GatedSource {
    async fn latest_signals(&self) -> Result<Value> {
        let (gate, response) = self
            .calls
            .lock()
            .await
            .pop_front()
            .expect("fetch issued with no staged response");
        gate.await.ok();
        response.map_err(|msg| anyhow!(msg))
    }

    async fn signal_stats(&self) -> Result<SignalStats> {
        Err(anyhow!("not scripted"))
    }

    async fn signal_by_id(&self, _id: &str) -> Result<Value> {
        Err(anyhow!("not scripted"))
    }

    async fn push_signal(&self, _body: &Value) -> Result<Value> {
        Err(anyhow!("not scripted"))
    }
}
