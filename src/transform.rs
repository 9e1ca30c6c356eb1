//! Per-item transform strategies — remote fetch and local thumbnail.
//!
//! Each strategy is a pure async function from seed to output: it performs
//! no side effects on shared state. Filename allocation and archive
//! insertion happen outside the strategy, in the processor and the store.

use async_trait::async_trait;

use crate::config::{FetchConfig, FetchMethod};
use crate::error::FetchError;
use crate::thumbnail::Thumbnailer;
use crate::types::Seed;

/// Output of a successful per-item transform
#[derive(Clone, Debug)]
pub struct Transformed {
    /// Displayable thumbnail data URL
    pub thumbnail: String,
    /// Retrieved payload bytes, present only for strategies that store output
    pub payload: Option<Vec<u8>>,
}

/// A per-item transform strategy.
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Perform the per-item work for one seed.
    async fn transform(&self, seed: &Seed) -> Result<Transformed, FetchError>;
}

/// Build the transformer selected by the configuration.
pub fn for_config(config: &FetchConfig) -> crate::error::Result<Box<dyn Transformer>> {
    match config.method {
        FetchMethod::Http => Ok(Box::new(HttpFetcher::new(config)?)),
        FetchMethod::Thumbnail => Ok(Box::new(LocalThumbnailer::new(config))),
    }
}

/// Remote-fetch strategy: HTTP byte retrieval plus thumbnail derivation.
pub struct HttpFetcher {
    client: reqwest::Client,
    thumbnailer: Thumbnailer,
}

impl HttpFetcher {
    /// Build the strategy, applying the configured timeout and User-Agent
    /// to the underlying HTTP client.
    pub fn new(config: &FetchConfig) -> crate::error::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self {
            client: builder.build()?,
            thumbnailer: Thumbnailer::new(&config.thumbnail),
        })
    }
}

#[async_trait]
impl Transformer for HttpFetcher {
    async fn transform(&self, seed: &Seed) -> Result<Transformed, FetchError> {
        let url = match seed {
            Seed::Url(url) => url.as_str(),
            Seed::File(file) => {
                return Err(FetchError::generic(format!(
                    "seed '{}' is a local file, not a URL",
                    file.name
                )));
            }
        };

        // Errors raised before a response exists are transport-level by
        // definition; everything after the response goes through the
        // status or generic paths.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|_| FetchError::network(url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                response.url().as_str(),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::generic(format!("failed to read response body: {e}")))?;

        let thumbnail = self.thumbnailer.from_bytes(&bytes)?;

        Ok(Transformed {
            thumbnail,
            payload: Some(bytes.to_vec()),
        })
    }
}

/// Local-thumbnail strategy: derive a thumbnail from an in-memory file.
///
/// No network is involved and no payload is produced, so no filename is
/// allocated downstream.
pub struct LocalThumbnailer {
    thumbnailer: Thumbnailer,
}

impl LocalThumbnailer {
    /// Build the strategy from the thumbnail settings.
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            thumbnailer: Thumbnailer::new(&config.thumbnail),
        }
    }
}

#[async_trait]
impl Transformer for LocalThumbnailer {
    async fn transform(&self, seed: &Seed) -> Result<Transformed, FetchError> {
        let file = match seed {
            Seed::File(file) => file,
            Seed::Url(url) => {
                return Err(FetchError::generic(format!(
                    "seed '{url}' is a URL, not a local file"
                )));
            }
        };

        let thumbnail = self.thumbnailer.from_file(file)?;

        Ok(Transformed {
            thumbnail,
            payload: None,
        })
    }
}
