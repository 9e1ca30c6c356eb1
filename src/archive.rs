//! In-memory archive of retrieved payloads, finalized as a zip on export.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};

use crate::error::Result;

/// Path prefix under which payload files are stored, keeping them distinct
/// from the serialized table entry at the archive root.
pub const IMAGES_PREFIX: &str = "images";

/// Mapping from path-like keys to binary payloads, scoped to one record
/// store instance.
///
/// Filenames are kept unique by the allocator upstream; inserting under an
/// existing path overwrites silently.
#[derive(Debug, Default)]
pub struct Archive {
    files: BTreeMap<String, Vec<u8>>,
}

impl Archive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file under the given path, overwriting any previous entry.
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    /// Insert a payload file under the images namespace.
    pub fn insert_image(&mut self, filename: &str, bytes: Vec<u8>) {
        self.insert(format!("{IMAGES_PREFIX}/{filename}"), bytes);
    }

    /// Number of entries in the archive.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the archive holds no entries.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether an entry exists under the given path.
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// The bytes stored under the given path, if any.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Iterate over the stored paths.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Encode all entries into a single zip bundle.
    pub fn finalize(&self) -> Result<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();

        for (path, bytes) in &self.files {
            writer.start_file(path.as_str(), options)?;
            writer.write_all(bytes)?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}
