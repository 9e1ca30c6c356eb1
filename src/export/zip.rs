//! Package-as-archive exporter.

use crate::error::Result;
use crate::store::RecordStore;

use super::csv::serialize_rows;
use super::{ExportPayload, Exporter};

/// Archive entry holding the serialized table, at the bundle root
const TABLE_ENTRY: &str = "imageset.csv";

/// Default filename suggested for packaged exports
const BUNDLE_EXPORT_NAME: &str = "imageset.zip";

/// Exporter that packages the serialized table and every stored payload
/// into a single zip bundle.
#[derive(Debug, Default)]
pub struct ZipExporter;

impl ZipExporter {
    /// Create the exporter.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Exporter for ZipExporter {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn export(&self, store: &mut dyn RecordStore) -> Result<ExportPayload> {
        let table = serialize_rows(store.headers(), store.rows())?;

        let archive = store.archive_mut();
        archive.insert(TABLE_ENTRY, table.into_bytes());
        let bytes = archive.finalize()?;

        Ok(ExportPayload {
            bytes,
            suggested_name: BUNDLE_EXPORT_NAME.to_string(),
            media_type: "application/zip",
        })
    }
}
