//! Configuration management for the assistant hosts.

use std::env;
use std::time::Duration;

use crate::{Error, Result};

const DEFAULT_BACKEND_URL: &str = "http://localhost:8080/api";

/// Backend configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend, without trailing slash
    pub backend_url: String,
    /// Bearer token sent with every backend call
    pub backend_token: Option<String>,
    /// Per-request timeout. `None` leaves outbound calls unbounded.
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("BACKEND_API_URL")
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if backend_url.is_empty() {
            return Err(Error::Config("BACKEND_API_URL is empty".to_string()));
        }

        let backend_token = lookup("BACKEND_API_TOKEN").filter(|t| !t.trim().is_empty());

        let request_timeout = match lookup("BACKEND_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    Error::Config(format!("BACKEND_TIMEOUT_SECS must be an integer, got '{}'", raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            backend_url,
            backend_token,
            request_timeout,
        })
    }
}
