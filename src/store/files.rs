//! File-set-backed record store: rows synthesized from local files.

use std::sync::Arc;

use crate::archive::Archive;
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::types::{LocalFile, ProcessingResult, Seed, SeedItem};

use super::{FILENAME_COLUMN, LoadSummary, RecordStore, Row, SourceInput, StoreState};

/// Record store whose rows come from a set of in-memory local files, one row
/// per image-typed file. Non-image files are dropped at load time.
#[derive(Debug)]
pub struct FileRecordStore {
    state: StoreState,
}

impl FileRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let mut state = StoreState::default();
        state.clear();
        Self { state }
    }

    /// Build one row per accepted file, replacing any prior state.
    pub fn load_files(&mut self, files: Vec<LocalFile>) -> Result<LoadSummary> {
        self.state.clear();

        for file in files {
            if !file.is_image() {
                tracing::debug!(
                    name = %file.name,
                    media_type = %file.media_type,
                    "skipping non-image file"
                );
                continue;
            }

            let file = Arc::new(file);
            let mut row = Row::with_file(Arc::clone(&file));
            row.set(FILENAME_COLUMN, file.name.clone());
            self.state.rows.push(row);
        }

        tracing::info!(rows = self.state.rows.len(), "loaded file set");

        Ok(LoadSummary {
            headers: self.state.headers.clone(),
            rows: self.state.rows.len(),
        })
    }
}

impl Default for FileRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for FileRecordStore {
    fn name(&self) -> &'static str {
        "files"
    }

    fn load(&mut self, input: SourceInput) -> Result<LoadSummary> {
        match input {
            SourceInput::Files(files) => self.load_files(files),
            SourceInput::Table(_) => Err(Error::Other(
                "files store loads local files, not tabular input".to_string(),
            )),
        }
    }

    // The seed of a file-backed row is the file handle itself; the
    // configured seed field does not apply to this variant.
    fn seeds(&self, _config: &FetchConfig) -> Vec<SeedItem> {
        self.state
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| SeedItem {
                index,
                seed: row.file().cloned().map(Seed::File),
            })
            .collect()
    }

    fn update(&mut self, result: &ProcessingResult) {
        self.state.update(result);
    }

    fn headers(&self) -> &[String] {
        &self.state.headers
    }

    fn rows(&self) -> &[Row] {
        &self.state.rows
    }

    fn archive_mut(&mut self) -> &mut Archive {
        self.state.archive_mut()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn sample_files() -> Vec<LocalFile> {
        vec![
            LocalFile::new("cat.png", "image/png", vec![1, 2]),
            LocalFile::new("notes.txt", "text/plain", vec![3]),
            LocalFile::new("dog.jpg", "image/jpeg", vec![4, 5]),
        ]
    }

    #[test]
    fn load_keeps_only_image_typed_files() {
        let mut store = FileRecordStore::new();
        let summary = store.load_files(sample_files()).unwrap();

        assert_eq!(summary.rows, 2, "the text file must be filtered out");
        assert_eq!(store.rows()[0].get(FILENAME_COLUMN), Some("cat.png"));
        assert_eq!(store.rows()[1].get(FILENAME_COLUMN), Some("dog.jpg"));
    }

    #[test]
    fn seeds_yield_the_file_handles_in_row_order() {
        let mut store = FileRecordStore::new();
        store.load_files(sample_files()).unwrap();

        let seeds = store.seeds(&FetchConfig::default());
        assert_eq!(seeds.len(), 2);
        assert!(
            matches!(&seeds[0].seed, Some(Seed::File(file)) if file.name == "cat.png")
        );
        assert!(
            matches!(&seeds[1].seed, Some(Seed::File(file)) if file.name == "dog.jpg")
        );
    }

    #[test]
    fn load_replaces_prior_rows() {
        let mut store = FileRecordStore::new();
        store.load_files(sample_files()).unwrap();
        store
            .load_files(vec![LocalFile::new("only.png", "image/png", vec![])])
            .unwrap();

        assert_eq!(store.rows().len(), 1);
        assert_eq!(store.rows()[0].get(FILENAME_COLUMN), Some("only.png"));
    }

    #[test]
    fn loading_tabular_input_is_rejected() {
        let mut store = FileRecordStore::new();
        assert!(store.load(SourceInput::Table("a,b\n".to_string())).is_err());
    }
}
