//! Table-backed record store: rows parsed from CSV text.

use crate::archive::Archive;
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::types::{ProcessingResult, Seed, SeedItem};

use super::{LoadSummary, RecordStore, Row, SourceInput, StoreState};

/// Record store whose rows come from structured tabular input.
#[derive(Debug)]
pub struct CsvRecordStore {
    state: StoreState,
}

impl CsvRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let mut state = StoreState::default();
        state.clear();
        Self { state }
    }

    #[cfg(test)]
    pub(crate) fn from_state_for_tests(state: StoreState) -> Self {
        Self { state }
    }

    /// Parse CSV text, first row as header, replacing any prior state.
    ///
    /// Parsed field names are merged after the reserved columns, preserving
    /// their input order.
    pub fn load_table(&mut self, text: &str) -> Result<LoadSummary> {
        self.state.clear();

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let parsed_headers: Vec<String> =
            reader.headers()?.iter().map(str::to_string).collect();

        for record in reader.records() {
            let record = record?;
            let mut row = Row::default();
            for (field, value) in parsed_headers.iter().zip(record.iter()) {
                row.set(field.clone(), value.to_string());
            }
            self.state.rows.push(row);
        }

        for field in &parsed_headers {
            if !self.state.headers.contains(field) {
                self.state.headers.push(field.clone());
            }
        }

        tracing::info!(
            rows = self.state.rows.len(),
            columns = parsed_headers.len(),
            "loaded tabular input"
        );

        Ok(LoadSummary {
            headers: self.state.headers.clone(),
            rows: self.state.rows.len(),
        })
    }
}

impl Default for CsvRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for CsvRecordStore {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn load(&mut self, input: SourceInput) -> Result<LoadSummary> {
        match input {
            SourceInput::Table(text) => self.load_table(&text),
            SourceInput::Files(_) => Err(Error::Other(
                "csv store loads tabular input, not files".to_string(),
            )),
        }
    }

    fn seeds(&self, config: &FetchConfig) -> Vec<SeedItem> {
        self.state
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let seed = row
                    .get(&config.seed_field)
                    .filter(|value| !value.is_empty())
                    .map(|value| Seed::Url(value.to_string()));
                SeedItem { index, seed }
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
    use crate::store::{FILENAME_COLUMN, STATUS_COLUMN, THUMBNAIL_COLUMN};

    const SAMPLE: &str = "name,url\nfirst,https://example.com/a.jpg\nsecond,\n";

    #[test]
    fn load_places_reserved_headers_before_parsed_columns() {
        let mut store = CsvRecordStore::new();
        let summary = store.load_table(SAMPLE).unwrap();

        assert_eq!(
            summary.headers,
            vec![STATUS_COLUMN, THUMBNAIL_COLUMN, FILENAME_COLUMN, "name", "url"],
            "reserved columns first, then input columns in parsed order"
        );
        assert_eq!(summary.rows, 2);
    }

    #[test]
    fn load_replaces_prior_rows_and_archive() {
        let mut store = CsvRecordStore::new();
        store.load_table(SAMPLE).unwrap();
        store.archive_mut().insert_image("old.jpg", vec![1]);

        let summary = store.load_table("url\nhttps://example.com/b.jpg\n").unwrap();
        assert_eq!(summary.rows, 1);
        assert!(
            store.archive_mut().is_empty(),
            "reloading must discard the previous archive"
        );
    }

    #[test]
    fn seeds_follow_the_configured_field() {
        let mut store = CsvRecordStore::new();
        store.load_table(SAMPLE).unwrap();

        let config = FetchConfig {
            seed_field: "url".to_string(),
            ..FetchConfig::default()
        };
        let seeds = store.seeds(&config);

        assert_eq!(seeds.len(), 2);
        assert!(
            matches!(&seeds[0].seed, Some(Seed::Url(url)) if url == "https://example.com/a.jpg")
        );
        assert!(
            seeds[1].seed.is_none(),
            "a blank cell must yield an absent seed"
        );
        assert_eq!(seeds[1].index, 1);
    }

    #[test]
    fn seeds_for_a_missing_column_are_all_absent() {
        let mut store = CsvRecordStore::new();
        store.load_table(SAMPLE).unwrap();

        let config = FetchConfig {
            seed_field: "nonexistent".to_string(),
            ..FetchConfig::default()
        };
        assert!(store.seeds(&config).iter().all(|item| item.seed.is_none()));
    }

    #[test]
    fn short_records_tolerated_by_flexible_parsing() {
        let mut store = CsvRecordStore::new();
        store
            .load_table("name,url,tag\nonly-name\n")
            .unwrap();

        assert_eq!(store.rows().len(), 1);
        assert_eq!(store.rows()[0].get("name"), Some("only-name"));
        assert_eq!(store.rows()[0].get("url"), None);
    }

    #[test]
    fn loading_files_input_is_rejected() {
        let mut store = CsvRecordStore::new();
        assert!(store.load(SourceInput::Files(vec![])).is_err());
    }
}
