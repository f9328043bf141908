use serde::{Deserialize, Serialize};

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Backend
    pub api_base_url: String,

    // Refresh cadence in seconds
    pub refresh_interval_secs: u64,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            api_base_url: env("API_BASE_URL", "http://localhost:8000"),
            refresh_interval_secs: env(
                "REFRESH_INTERVAL_SECS",
                &DEFAULT_REFRESH_INTERVAL_SECS.to_string(),
            )
            .parse()
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS),
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }
}
