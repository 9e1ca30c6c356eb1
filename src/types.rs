//! Core types and events for imageset-dl

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::FetchConfig;
use crate::error::FetchError;

/// An in-memory local file handle, the seed for local-thumbnail processing.
#[derive(Clone, Debug)]
pub struct LocalFile {
    /// Original filename
    pub name: String,
    /// Media type, e.g. `image/png`
    pub media_type: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl LocalFile {
    /// Create a new local file handle.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Whether the file carries an image media type.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// The raw reference driving per-item processing.
#[derive(Clone, Debug)]
pub enum Seed {
    /// A remote image URL
    Url(String),
    /// An in-memory local file
    File(Arc<LocalFile>),
}

/// One entry of the seed sequence derived from a record store at batch start.
///
/// `index` is the row's stable position at the moment the batch started and
/// uniquely identifies the row for the lifetime of the batch.
#[derive(Clone, Debug)]
pub struct SeedItem {
    /// Stable 0-based row position
    pub index: usize,
    /// The seed value, `None` when the row has no usable seed
    pub seed: Option<Seed>,
}

/// Terminal status assigned to a processed item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// The transform completed and produced a thumbnail
    Success,
    /// The transform failed; the result carries a classified error
    Fail,
    /// The row had no seed; no transform was attempted
    Empty,
}

impl ItemStatus {
    /// Status label written into the row's status column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Success => "success",
            ItemStatus::Fail => "fail",
            ItemStatus::Empty => "empty",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of processing one seed item.
///
/// Exactly one terminal status is assigned per item; `payload` and
/// `filename` are present only on remote-fetch success.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Row index the result applies to
    pub index: usize,
    /// Terminal status
    pub status: ItemStatus,
    /// Allocated output filename, for strategies that store a payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Retrieved payload bytes destined for the archive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Vec<u8>>,
    /// Displayable thumbnail data URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Classified failure, present only when status is `fail`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetchError>,
}

impl ProcessingResult {
    /// Successful result with a thumbnail and optionally a stored payload.
    pub fn success(
        index: usize,
        thumbnail: String,
        filename: Option<String>,
        payload: Option<Vec<u8>>,
    ) -> Self {
        Self {
            index,
            status: ItemStatus::Success,
            filename,
            payload,
            thumbnail: Some(thumbnail),
            error: None,
        }
    }

    /// Failed result carrying the classified error.
    pub fn failed(index: usize, error: FetchError) -> Self {
        Self {
            index,
            status: ItemStatus::Fail,
            filename: None,
            payload: None,
            thumbnail: None,
            error: Some(error),
        }
    }

    /// Result for a row with no seed.
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            status: ItemStatus::Empty,
            filename: None,
            payload: None,
            thumbnail: None,
            error: None,
        }
    }
}

/// Event emitted during a batch run
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A batch run started
    BatchStarted {
        /// Configuration driving the run
        config: FetchConfig,
    },

    /// An item reached a terminal status of `success` or `empty`
    ItemUpdated {
        /// The item's processing result
        result: ProcessingResult,
    },

    /// An item failed; disjoint event identity from [`Event::ItemUpdated`]
    ItemError {
        /// The item's processing result, carrying the classified error
        result: ProcessingResult,
    },

    /// One item finished, regardless of outcome
    Progress {
        /// Items processed so far, counting the current one
        current: usize,
        /// Length of the seed sequence
        total: usize,
    },

    /// The batch run ended, exhausted or cancelled
    BatchFinished {
        /// Configuration that drove the run
        config: FetchConfig,
    },
}

/// Processing statistics over a record store's rows
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Total number of rows
    pub total: usize,
    /// Rows whose status is `success`
    pub successful: usize,
    /// Rows with a non-empty status other than `success`
    pub failed: usize,
    /// Rows not yet processed
    pub pending: usize,
    /// Fraction of rows with a terminal status, 0.0 for an empty store
    pub progress: f32,
}
