// Manifest reader.
//
// A manifest is a headerless CSV file with one listing update per line:
// `user_id,property_id,listing_id,listing_state,auth_token`. Rows are
// produced lazily in a single forward pass.

use crate::error::ManifestError;
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of columns every manifest line must have.
pub const MANIFEST_FIELDS: usize = 5;

/// One listing update request. Fields are positional, in file order.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub user_id: String,
    pub property_id: String,
    pub listing_id: String,
    pub listing_state: String,
    pub auth_token: String,
}

/// Lazy iterator over manifest rows.
///
/// Yields `Err` for a line with the wrong field count or an underlying
/// read failure, and stops after the first error.
pub struct ManifestReader<R> {
    reader: csv::Reader<R>,
    record: StringRecord,
    done: bool,
}

impl ManifestReader<File> {
    /// Open a manifest file. A missing or unreadable file fails here,
    /// before any row is produced.
    pub fn open(path: &Path) -> Result<Self, ManifestError> {
        let file = File::open(path).map_err(|source| ManifestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> ManifestReader<R> {
    pub fn from_reader(rdr: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            // Field counts are checked per line so the error names the line.
            .flexible(true)
            .from_reader(rdr);
        ManifestReader {
            reader,
            record: StringRecord::new(),
            done: false,
        }
    }

    fn current_row(&self) -> Result<ManifestRow, ManifestError> {
        if self.record.len() != MANIFEST_FIELDS {
            let line = self.record.position().map(|p| p.line()).unwrap_or(0);
            return Err(ManifestError::MalformedRecord {
                line,
                expected: MANIFEST_FIELDS,
                found: self.record.len(),
            });
        }
        Ok(self.record.deserialize(None)?)
    }
}

impl<R: Read> Iterator for ManifestReader<R> {
    type Item = Result<ManifestRow, ManifestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.reader.read_record(&mut self.record) {
            Ok(false) => {
                self.done = true;
                return None;
            }
            Ok(true) => self.current_row(),
            Err(e) => Err(e.into()),
        };
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

/// Whether a path looks like a delimited manifest file (`*.csv`).
pub fn looks_like_manifest(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}
