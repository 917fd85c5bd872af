//! Startup configuration.
//!
//! Everything comes from the environment, read once before the MCP transport
//! starts serving:
//! - `TAIGA_API_URL` - Base URL of the Taiga API (e.g. `https://api.taiga.io/api/v1`)
//! - `TAIGA_USERNAME` / `TAIGA_PASSWORD` - Credentials exchanged for a session at startup
//! - `TAIGA_DEFAULT_PROJECT` - Optional project ID injected into list filters
//!   and `get_project_info` when the caller names no project

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL without a trailing slash.
    pub api_url: String,
    pub username: String,
    pub password: String,
    /// Project ID used when a tool call leaves the project unspecified.
    pub default_project: Option<i64>,
}

impl Config {
    /// Read configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("TAIGA_API_URL").context("TAIGA_API_URL is not set")?;
        let username = std::env::var("TAIGA_USERNAME").context("TAIGA_USERNAME is not set")?;
        let password = std::env::var("TAIGA_PASSWORD").context("TAIGA_PASSWORD is not set")?;

        let default_project = match std::env::var("TAIGA_DEFAULT_PROJECT") {
            Ok(raw) => Some(raw.parse::<i64>().with_context(|| {
                format!("TAIGA_DEFAULT_PROJECT is not a numeric project ID: {raw}")
            })?),
            Err(_) => None,
        };

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            username,
            password,
            default_project,
        })
    }
}
