//! Thumbnail derivation — decode image bytes, bound the longest edge, emit a
//! displayable data URL.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;

use crate::config::ThumbnailConfig;
use crate::error::FetchError;
use crate::types::LocalFile;

/// Derives displayable thumbnails from raw image bytes.
pub struct Thumbnailer {
    max_dimension: u32,
}

impl Thumbnailer {
    /// Create a thumbnailer from the given settings.
    pub fn new(config: &ThumbnailConfig) -> Self {
        Self {
            max_dimension: config.max_dimension,
        }
    }

    /// Derive a `data:image/png;base64,…` thumbnail from raw image bytes.
    ///
    /// Decode and encode failures surface as [`FetchError::Generic`], since
    /// they are neither transport- nor status-level failures.
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<String, FetchError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| FetchError::generic(format!("thumbnail decode failed: {e}")))?;

        let thumb = decoded.thumbnail(self.max_dimension, self.max_dimension);

        let mut out = Cursor::new(Vec::new());
        thumb
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| FetchError::generic(format!("thumbnail encode failed: {e}")))?;

        Ok(format!(
            "data:image/png;base64,{}",
            STANDARD.encode(out.get_ref())
        ))
    }

    /// Derive a thumbnail from an in-memory local file.
    pub fn from_file(&self, file: &LocalFile) -> Result<String, FetchError> {
        self.from_bytes(&file.bytes)
    }
}
