//! Configuration types for imageset-dl

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-item transform strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMethod {
    /// Remote fetch: HTTP byte retrieval plus thumbnail derivation
    #[default]
    Http,
    /// Local thumbnail: derive a thumbnail from an in-memory file, no network
    Thumbnail,
}

/// Thumbnail derivation settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Longest-edge bound for derived thumbnails, in pixels (default: 128)
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
        }
    }
}

/// Configuration for one batch run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Name of the column holding the seed value (default: "url")
    #[serde(default = "default_seed_field")]
    pub seed_field: String,

    /// Per-item transform strategy (default: http)
    #[serde(default)]
    pub method: FetchMethod,

    /// Timeout applied to each retrieval (None = a single retrieval may wait
    /// indefinitely and block the remainder of the batch)
    #[serde(default)]
    pub request_timeout: Option<Duration>,

    /// User-Agent header sent with remote fetches (None = client default)
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Thumbnail derivation settings
    #[serde(default)]
    pub thumbnail: ThumbnailConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            seed_field: default_seed_field(),
            method: FetchMethod::default(),
            request_timeout: None,
            user_agent: None,
            thumbnail: ThumbnailConfig::default(),
        }
    }
}

fn default_seed_field() -> String {
    "url".to_string()
}

fn default_max_dimension() -> u32 {
    128
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_the_url_column_over_http() {
        let config = FetchConfig::default();
        assert_eq!(config.seed_field, "url");
        assert_eq!(config.method, FetchMethod::Http);
        assert!(config.request_timeout.is_none());
        assert_eq!(config.thumbnail.max_dimension, 128);
    }

    #[test]
    fn partial_json_fills_in_field_defaults() {
        let config: FetchConfig =
            serde_json::from_str(r#"{"seed_field": "image_url"}"#).unwrap();
        assert_eq!(config.seed_field, "image_url");
        assert_eq!(
            config.method,
            FetchMethod::Http,
            "omitted method must default to http"
        );
        assert_eq!(config.thumbnail.max_dimension, 128);
    }

    #[test]
    fn method_deserializes_from_lowercase_names() {
        let config: FetchConfig =
            serde_json::from_str(r#"{"method": "thumbnail"}"#).unwrap();
        assert_eq!(config.method, FetchMethod::Thumbnail);
    }
}
