// Photo locator: find the photos for a property on local disk.
//
// Photos for property `P` live directly under `<root>/P/`. Only files
// whose name contains `.jpg` are picked up, ordered by filename.

use crate::error::PhotoError;
use std::fs;
use std::path::{Path, PathBuf};

/// Marker a filename must contain to be uploaded.
pub const IMAGE_MARKER: &str = ".jpg";

/// A photo selected for upload and its rank in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEntry {
    pub file_path: PathBuf,
    pub display_order: usize,
}

/// Directory holding the photos for one property.
pub fn property_dir(root: &Path, property_id: &str) -> PathBuf {
    root.join(property_id)
}

/// List the photos for `property_id`, sorted ascending by filename.
///
/// Display orders are assigned after filtering, so they always form the
/// contiguous range `0..n`. Subdirectories are not descended into.
pub fn locate_photos(root: &Path, property_id: &str) -> Result<Vec<PhotoEntry>, PhotoError> {
    let dir = property_dir(root, property_id);
    let read_err = |source| PhotoError::ReadDir {
        path: dir.clone(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(&dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_string_lossy().contains(IMAGE_MARKER) {
            names.push(name);
        }
    }
    names.sort();

    Ok(names
        .into_iter()
        .enumerate()
        .map(|(display_order, name)| PhotoEntry {
            file_path: dir.join(name),
            display_order,
        })
        .collect())
}
