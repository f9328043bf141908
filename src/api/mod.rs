pub mod portal;

pub use portal::PortalClient;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::SignalStats;

/// Transport-level failures from the signal backend. The feed treats every
/// variant uniformly as one failed fetch cycle.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Remote signal backend. Payloads come back as raw JSON; shape handling
/// belongs to the normalizer, not the transport.
#[async_trait]
pub trait SignalSource: Send + Sync {
    async fn latest_signals(&self) -> Result<Value>;
    async fn signal_stats(&self) -> Result<SignalStats>;
    async fn signal_by_id(&self, id: &str) -> Result<Value>;
    async fn push_signal(&self, body: &Value) -> Result<Value>;
}
