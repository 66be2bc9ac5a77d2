//! Client configuration.
//!
//! The backend location comes from the `SCOUT_API_URL` environment variable,
//! falling back to the local development server.

use std::time::Duration;

/// Default backend base URL (local development server).
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Request deadline for every API call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime configuration for the Scout client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API, including the `/api` prefix
    pub api_base_url: String,
    /// Per-request deadline
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    /// Build a config from the environment.
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("SCOUT_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            api_base_url,
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the base URL (used by tests against a mock server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:3001/api");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn with_base_url_overrides() {
        let config = Config::default().with_base_url("http://127.0.0.1:9000/api");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000/api");
    }
}
