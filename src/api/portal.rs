use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::api::{SignalSource, SourceError};
use crate::config::Config;
use crate::models::SignalStats;

/// HTTP client for the futures portal backend.
pub struct PortalClient {
    client: Client,
    base_url: String,
}

impl PortalClient {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, SourceError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        Self::check_status(resp).await
    }

    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, SourceError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }
        Ok(resp)
    }
}

#[async_trait]
impl SignalSource for PortalClient {
    async fn latest_signals(&self) -> Result<Value> {
        let resp = self.get("/api/signals/latest").await?;
        resp.json()
            .await
            .context("Failed to decode latest signals response")
    }

    async fn signal_stats(&self) -> Result<SignalStats> {
        let resp = self.get("/api/signals/stats").await?;
        resp.json().await.context("Failed to decode stats response")
    }

    async fn signal_by_id(&self, id: &str) -> Result<Value> {
        let resp = self.get(&format!("/api/signals/{}", id)).await?;
        resp.json().await.context("Failed to decode signal response")
    }

    async fn push_signal(&self, body: &Value) -> Result<Value> {
        let resp = self
            .client
            .post(format!("{}/signals/push", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(SourceError::from)?;
        let resp = Self::check_status(resp).await?;
        resp.json().await.context("Failed to decode push response")
    }
}
