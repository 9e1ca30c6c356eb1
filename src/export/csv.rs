//! Serialize-rows-as-table exporter.

use crate::error::{Error, Result};
use crate::store::{RecordStore, Row};

use super::{ExportPayload, Exporter};

/// Default filename suggested for table exports
const TABLE_EXPORT_NAME: &str = "imageset.csv";

/// Serialize rows to CSV text honoring the given header order, padding
/// missing cells with empty strings.
pub(crate) fn serialize_rows(headers: &[String], rows: &[Row]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(headers.iter().map(|header| row.get(header).unwrap_or("")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Other(format!("could not flush table writer: {e}")))?;
    String::from_utf8(bytes).map_err(|e| Error::Other(format!("table is not valid UTF-8: {e}")))
}

/// Exporter that produces a text table of all current rows.
#[derive(Debug, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Create the exporter.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Exporter for CsvExporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn export(&self, store: &mut dyn RecordStore) -> Result<ExportPayload> {
        let table = serialize_rows(store.headers(), store.rows())?;

        Ok(ExportPayload {
            bytes: table.into_bytes(),
            suggested_name: TABLE_EXPORT_NAME.to_string(),
            media_type: "text/csv",
        })
    }
}
