//! Record stores — pluggable row tables backing the seed sequence.
//!
//! A store owns the working rows and the archive of retrieved payloads. The
//! processor derives its seed sequence from the store and hands every
//! per-item result back through [`RecordStore::update`]; exporters read the
//! rows and archive at the end of a run.

mod csv;
mod files;

pub use csv::CsvRecordStore;
pub use files::FileRecordStore;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::archive::Archive;
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::types::{BatchStats, ItemStatus, LocalFile, ProcessingResult, SeedItem};

/// Reserved output column: terminal status per row
pub const STATUS_COLUMN: &str = "ims_status";
/// Reserved output column: displayable thumbnail data URL
pub const THUMBNAIL_COLUMN: &str = "ims_thumbnail";
/// Reserved output column: assigned payload filename
pub const FILENAME_COLUMN: &str = "ims_filename";

fn reserved_headers() -> Vec<String> {
    vec![
        STATUS_COLUMN.to_string(),
        THUMBNAIL_COLUMN.to_string(),
        FILENAME_COLUMN.to_string(),
    ]
}

/// One mutable record of the working table.
///
/// Carries arbitrary input columns plus the reserved output columns, and for
/// file-backed stores a back-reference to the original file handle.
#[derive(Clone, Debug, Default)]
pub struct Row {
    fields: HashMap<String, String>,
    file: Option<Arc<LocalFile>>,
}

impl Row {
    pub(crate) fn with_file(file: Arc<LocalFile>) -> Self {
        Self {
            fields: HashMap::new(),
            file: Some(file),
        }
    }

    /// Value of a column, if present.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Set a column value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Back-reference to the original file handle, for file-backed rows.
    pub fn file(&self) -> Option<&Arc<LocalFile>> {
        self.file.as_ref()
    }
}

/// Record-store variant keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Table-backed store, rows parsed from CSV text
    Csv,
    /// File-set-backed store, rows synthesized from local files
    Files,
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(SourceKind::Csv),
            "files" => Ok(SourceKind::Files),
            other => Err(Error::UnsupportedSource(other.to_string())),
        }
    }
}

/// Input accepted by [`RecordStore::load`]
#[derive(Clone, Debug)]
pub enum SourceInput {
    /// Raw tabular text, first row is the header
    Table(String),
    /// A set of in-memory local files
    Files(Vec<LocalFile>),
}

/// Summary of a successful load
#[derive(Clone, Debug)]
pub struct LoadSummary {
    /// Full header list, reserved columns first
    pub headers: Vec<String>,
    /// Number of rows accepted
    pub rows: usize,
}

/// The table of rows backing a seed sequence.
pub trait RecordStore: Send {
    /// Variant name, matching the factory key.
    fn name(&self) -> &'static str;

    /// Parse the given input, discarding any prior rows and archive first.
    fn load(&mut self, input: SourceInput) -> Result<LoadSummary>;

    /// Map every current row to a [`SeedItem`], in row order.
    fn seeds(&self, config: &FetchConfig) -> Vec<SeedItem>;

    /// Apply a per-item result to the addressed row.
    ///
    /// An out-of-bounds index is an internal consistency fault: it is logged
    /// and swallowed, never propagated.
    fn update(&mut self, result: &ProcessingResult);

    /// Header list, reserved columns first then input columns in parsed order.
    fn headers(&self) -> &[String];

    /// The current rows.
    fn rows(&self) -> &[Row];

    /// The payload archive, created lazily on first access.
    fn archive_mut(&mut self) -> &mut Archive;

    /// Processing statistics over the current rows.
    fn stats(&self) -> BatchStats {
        let rows = self.rows();
        let total = rows.len();
        let successful = rows
            .iter()
            .filter(|row| row.get(STATUS_COLUMN) == Some(ItemStatus::Success.as_str()))
            .count();
        let failed = rows
            .iter()
            .filter(|row| {
                matches!(row.get(STATUS_COLUMN),
                    Some(status) if !status.is_empty() && status != ItemStatus::Success.as_str())
            })
            .count();
        let pending = total - successful - failed;

        BatchStats {
            total,
            successful,
            failed,
            pending,
            progress: if total > 0 {
                (successful + failed) as f32 / total as f32
            } else {
                0.0
            },
        }
    }
}

/// Create a record store for the given variant.
pub fn source_for(kind: SourceKind) -> Box<dyn RecordStore> {
    match kind {
        SourceKind::Csv => Box::new(CsvRecordStore::new()),
        SourceKind::Files => Box::new(FileRecordStore::new()),
    }
}

/// Create a record store from a variant name, failing fast on unknown keys.
pub fn source_for_name(name: &str) -> Result<Box<dyn RecordStore>> {
    name.parse().map(source_for)
}

/// Shared row/header/archive state embedded by every store variant.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Row>,
    pub(crate) archive: Option<Archive>,
}

impl StoreState {
    /// Discard rows and archive, restoring the reserved header list.
    pub(crate) fn clear(&mut self) {
        self.archive = None;
        self.rows.clear();
        self.headers = reserved_headers();
    }

    pub(crate) fn update(&mut self, result: &ProcessingResult) {
        let Some(row) = self.rows.get_mut(result.index) else {
            tracing::error!(
                index = result.index,
                rows = self.rows.len(),
                "update addressed an invalid row index"
            );
            return;
        };

        let status = match (&result.status, &result.error) {
            (ItemStatus::Fail, Some(error)) => error.row_status(),
            (status, _) => status.as_str().to_string(),
        };
        row.set(STATUS_COLUMN, status);

        if let Some(thumbnail) = &result.thumbnail {
            row.set(THUMBNAIL_COLUMN, thumbnail.clone());
        }
        if let Some(filename) = &result.filename {
            row.set(FILENAME_COLUMN, filename.clone());
        }
        if let (Some(filename), Some(payload)) = (&result.filename, &result.payload) {
            self.archive_mut().insert_image(filename, payload.clone());
        }
    }

    pub(crate) fn archive_mut(&mut self) -> &mut Archive {
        self.archive.get_or_insert_with(Archive::new)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    #[test]
    fn source_kind_parses_known_keys_and_rejects_others() {
        assert_eq!("csv".parse::<SourceKind>().unwrap(), SourceKind::Csv);
        assert_eq!("files".parse::<SourceKind>().unwrap(), SourceKind::Files);

        match "tsv".parse::<SourceKind>() {
            Err(Error::UnsupportedSource(key)) => assert_eq!(key, "tsv"),
            other => panic!("expected UnsupportedSource, got {other:?}"),
        }
    }

    #[test]
    fn source_factory_builds_the_matching_variant() {
        assert_eq!(source_for(SourceKind::Csv).name(), "csv");
        assert_eq!(source_for(SourceKind::Files).name(), "files");
        assert!(source_for_name("parquet").is_err());
    }

    #[test]
    fn update_on_an_invalid_index_is_swallowed() {
        let mut state = StoreState::default();
        state.clear();

        // No rows loaded; the fault must be logged, not panic or grow rows.
        state.update(&ProcessingResult::empty(7));
        assert!(state.rows.is_empty());
    }

    #[test]
    fn update_twice_with_the_same_result_is_idempotent() {
        let mut state = StoreState::default();
        state.clear();
        state.rows.push(Row::default());

        let result = ProcessingResult::success(
            0,
            "data:image/png;base64,AAAA".to_string(),
            Some("cat.jpg".to_string()),
            Some(vec![1, 2, 3]),
        );

        state.update(&result);
        let fields_after_first = state.rows[0].fields.clone();
        let archive_len = state.archive_mut().len();

        state.update(&result);
        assert_eq!(state.rows[0].fields, fields_after_first);
        assert_eq!(
            state.archive_mut().len(),
            archive_len,
            "re-applying the same result must not grow the archive"
        );
    }

    #[test]
    fn failed_update_writes_the_error_label_into_the_status_column() {
        let mut state = StoreState::default();
        state.clear();
        state.rows.push(Row::default());

        state.update(&ProcessingResult::failed(
            0,
            FetchError::network("http://bad/"),
        ));

        assert_eq!(
            state.rows[0].get(STATUS_COLUMN),
            Some("NetworkError Network or CORS error")
        );
    }

    #[test]
    fn payload_with_filename_lands_in_the_archive_under_the_images_prefix() {
        let mut state = StoreState::default();
        state.clear();
        state.rows.push(Row::default());

        state.update(&ProcessingResult::success(
            0,
            "data:image/png;base64,AAAA".to_string(),
            Some("cat.jpg".to_string()),
            Some(vec![9, 9]),
        ));

        assert!(state.archive_mut().contains("images/cat.jpg"));
    }

    #[test]
    fn stats_counts_empty_as_a_failed_terminal_status() {
        let mut state = StoreState::default();
        state.clear();
        state.rows.push(Row::default());
        state.rows.push(Row::default());
        state.rows.push(Row::default());

        state.update(&ProcessingResult::success(
            0,
            "data:image/png;base64,AAAA".to_string(),
            None,
            None,
        ));
        state.update(&ProcessingResult::empty(1));
        state.update(&ProcessingResult::failed(
            2,
            FetchError::network("http://bad/"),
        ));

        let store = CsvRecordStore::from_state_for_tests(state);
        let stats = store.stats();
        assert_eq!(
            stats,
            BatchStats {
                total: 3,
                successful: 1,
                failed: 2,
                pending: 0,
                progress: 1.0
            }
        );
    }

    #[test]
    fn stats_of_an_empty_store_reports_zero_progress() {
        let store = CsvRecordStore::new();
        let stats = store.stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.progress, 0.0);
    }
}
