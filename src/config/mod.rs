//! Run configuration.
//!
//! `FetchConfig` carries every upstream endpoint and the worker bound. The
//! defaults point at the real upstreams; a JSON settings file can override
//! any subset of fields (see [`loader`]).

pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use loader::{default_settings_path, load_config_from_file, load_or_default, validate_config};

/// Endpoints and limits for a single fetch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// grsecurity testing RSS feed
    pub grsec_feed_url: String,
    /// GitHub REST API root used for "latest release" lookups
    pub github_api_base: String,
    /// kernel.org archive root (without the series directory)
    pub kernel_mirror_base: String,
    /// Major-series directory under the mirror root, e.g. `v4.x`
    pub kernel_series_dir: String,
    /// Concurrent download workers
    pub max_workers: usize,
    /// Sent on every request; api.github.com refuses requests without one
    pub user_agent: String,
    /// Optional per-request timeout in seconds. Unset means wait forever.
    pub request_timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            grsec_feed_url: "https://grsecurity.net/testing_rss.php".to_string(),
            github_api_base: "https://api.github.com".to_string(),
            kernel_mirror_base: "https://cdn.kernel.org/pub/linux/kernel".to_string(),
            kernel_series_dir: "v4.x".to_string(),
            max_workers: 4,
            user_agent: format!("kernel_patch_fetch/{}", crate::VERSION),
            request_timeout_secs: None,
        }
    }
}

impl FetchConfig {
    /// Build the HTTP client shared by the resolver and the orchestrator
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
            .build()
            .map_err(|e| crate::error::FetchError::Config(format!("cannot build HTTP client: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.kernel_series_dir, "v4.x");
        assert!(config.user_agent.starts_with("kernel_patch_fetch/"));
        assert!(config.request_timeout_secs.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: FetchConfig =
            serde_json::from_str(r#"{"kernel_series_dir": "v5.x", "max_workers": 2}"#).unwrap();
        assert_eq!(config.kernel_series_dir, "v5.x");
        assert_eq!(config.max_workers, 2);
        assert_eq!(config.github_api_base, "https://api.github.com");
    }

    #[test]
    fn test_build_client() {
        let config = FetchConfig {
            request_timeout_secs: Some(30),
            ..FetchConfig::default()
        };
        assert!(config.build_client().is_ok());
    }
}
