//! Download sinks — fire-and-forget delivery of finalized export bytes.

use std::path::PathBuf;

use async_trait::async_trait;

/// Receives finalized export bytes.
///
/// Delivery is fire-and-forget: implementations log their own failures and
/// return nothing the core consumes.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Deliver the bytes under the suggested name.
    async fn save(&self, bytes: Vec<u8>, suggested_name: &str);
}

/// Sink that writes exports into a directory on disk.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Create a sink writing into the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for FileSink {
    async fn save(&self, bytes: Vec<u8>, suggested_name: &str) {
        let path = self.dir.join(suggested_name);
        match tokio::fs::write(&path, &bytes).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), bytes = bytes.len(), "export saved");
            }
            Err(error) => {
                tracing::error!(
                    path = %path.display(),
                    error = %error,
                    "failed to save export"
                );
            }
        }
    }
}
