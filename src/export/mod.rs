//! Exporters — externalize a record store as a serialized table or a
//! packaged archive.
//!
//! Exporters are read-only with respect to the store, except that the
//! archive variant inserts the serialized table into the shared archive
//! before finalizing it.

mod csv;
mod zip;

pub use csv::CsvExporter;
pub use zip::ZipExporter;

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sink::DownloadSink;
use crate::store::RecordStore;

/// Finalized export output
#[derive(Clone, Debug)]
pub struct ExportPayload {
    /// The serialized bytes to deliver
    pub bytes: Vec<u8>,
    /// Filename suggested to the sink
    pub suggested_name: String,
    /// Media type of the bytes
    pub media_type: &'static str,
}

/// Exporter variant keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Serialize all rows as a CSV table
    Csv,
    /// Package the table and stored payloads as a single zip bundle
    Zip,
}

impl FromStr for TargetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(TargetKind::Csv),
            "zip" => Ok(TargetKind::Zip),
            other => Err(Error::UnsupportedTarget(other.to_string())),
        }
    }
}

/// Externalizes a finalized record store.
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Variant name, matching the factory key.
    fn name(&self) -> &'static str;

    /// Produce the finalized export bytes.
    fn export(&self, store: &mut dyn RecordStore) -> Result<ExportPayload>;

    /// Externalize the store through the sink.
    ///
    /// Failures are routed to the logging channel with the original message
    /// and error kind; this never propagates an error to the caller.
    async fn download(&self, store: &mut dyn RecordStore, sink: &dyn DownloadSink) {
        match self.export(store) {
            Ok(payload) => sink.save(payload.bytes, &payload.suggested_name).await,
            Err(error) => {
                tracing::error!(
                    target = self.name(),
                    error = %error,
                    error_kind = error.kind(),
                    "could not generate download file"
                );
            }
        }
    }
}

/// Create an exporter for the given variant.
pub fn target_for(kind: TargetKind) -> Box<dyn Exporter> {
    match kind {
        TargetKind::Csv => Box::new(CsvExporter::new()),
        TargetKind::Zip => Box::new(ZipExporter::new()),
    }
}

/// Create an exporter from a variant name, failing fast on unknown keys.
pub fn target_for_name(name: &str) -> Result<Box<dyn Exporter>> {
    name.parse().map(target_for)
}
