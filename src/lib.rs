//! # imageset-dl
//!
//! Batch image fetching and dataset packaging library.
//!
//! imageset-dl turns a tabular list of image references (URLs or in-memory
//! local files) into a curated, downloadable dataset: it retrieves or
//! derives an image for each row, records success or failure per row, and
//! packages the result as an updated table or a single zip bundle.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to lifecycle events, no polling
//! - **Sequential by design** - One item at a time, cooperative cancellation
//! - **Failure-isolating** - A failed row never aborts the batch
//!
//! ## Quick Start
//!
//! ```no_run
//! use imageset_dl::{
//!     BatchProcessor, CsvRecordStore, Exporter, FetchConfig, FileSink,
//!     RecordStore, SourceInput, ZipExporter,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = CsvRecordStore::new();
//!     store.load(SourceInput::Table(
//!         "url\nhttps://example.com/cat.jpg\n".to_string(),
//!     ))?;
//!
//!     let processor = BatchProcessor::new();
//!
//!     // Subscribe to events
//!     let mut events = processor.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     processor.process(&mut store, &FetchConfig::default()).await;
//!
//!     let exporter = ZipExporter::new();
//!     let sink = FileSink::new("./exports");
//!     exporter.download(&mut store, &sink).await;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// In-memory payload archive
pub mod archive;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Exporters (serialized table, packaged archive)
pub mod export;
/// Unique output-filename allocation
pub mod naming;
/// Batch processing pipeline
pub mod processor;
/// Download sinks
pub mod sink;
/// Record stores (tabular and file-set sources)
pub mod store;
/// Thumbnail derivation
pub mod thumbnail;
/// Per-item transform strategies
pub mod transform;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use archive::Archive;
pub use config::{FetchConfig, FetchMethod, ThumbnailConfig};
pub use error::{Error, FetchError, Result};
pub use export::{
    CsvExporter, ExportPayload, Exporter, TargetKind, ZipExporter, target_for, target_for_name,
};
pub use processor::BatchProcessor;
pub use sink::{DownloadSink, FileSink};
pub use store::{
    CsvRecordStore, FileRecordStore, LoadSummary, RecordStore, Row, SourceInput, SourceKind,
    source_for, source_for_name,
};
pub use thumbnail::Thumbnailer;
pub use transform::{HttpFetcher, LocalThumbnailer, Transformed, Transformer};
pub use types::{
    BatchStats, Event, ItemStatus, LocalFile, ProcessingResult, Seed, SeedItem,
};
