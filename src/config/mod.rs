/// Application configuration module
use std::env;
use std::net::SocketAddr;

use anyhow::Context;

pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://observerly.com",
    "https://app.observerly.com",
    "https://vega.observerly.com",
    "http://localhost:3001",
];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Version segment that `/version` and unknown paths point at, e.g. `v2`
    pub api_version_latest: String,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8103)),
            api_version_latest: "v2".to_string(),
            cors_allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("BIND_ADDR '{}' is not a socket address", raw))?,
            None => defaults.bind_addr,
        };

        let api_version_latest = lookup("API_VERSION_LATEST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api_version_latest);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|s| split_list(&s))
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.cors_allowed_origins);

        Ok(Self {
            bind_addr,
            api_version_latest,
            cors_allowed_origins,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
