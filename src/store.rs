use std::fs;
use std::path::PathBuf;

use log::info;
use serde::Serialize;

use crate::error::Result;

/// Writes record collections as JSON files into the output directory.
///
/// Files are overwritten on every run; there is no merging with data from
/// previous backups.
pub struct Store {
    dir: PathBuf,
    pretty: bool,
}

impl Store {
    pub fn new(dir: PathBuf, pretty: bool) -> Self {
        Self { dir, pretty }
    }

    /// Serializes `records` to `filename` inside the output directory.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save<T: Serialize>(&self, records: &[T], filename: &str) -> Result<PathBuf> {
        let path = self.dir.join(filename);

        let json = if self.pretty {
            serde_json::to_string_pretty(records)?
        } else {
            serde_json::to_string(records)?
        };
        fs::write(&path, json)?;

        info!("Saved {} records to {}", records.len(), path.display());

        Ok(path)
    }

    /// Like `save`, but skips the write entirely for an empty collection.
    ///
    /// Returns `None` when nothing was written.
    pub fn save_if_any<T: Serialize>(
        &self,
        records: &[T],
        filename: &str,
    ) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            info!("No data to save for {filename}");
            return Ok(None);
        }

        self.save(records, filename).map(Some)
    }
}
