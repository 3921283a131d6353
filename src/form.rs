// Form builder: maps ordered photos and the listing state into the
// field layout the listings endpoint expects.
//
// Building a payload never touches the filesystem. Files are only
// opened when the payload is encoded by `crate::api::UploadClient`.

use crate::photos::PhotoEntry;
use serde_json::{json, Map, Value};
use std::path::PathBuf;

/// Field carrying the listing's target state.
pub const LISTING_TYPE_FIELD: &str = "listing_type";

/// Name of the image field for the photo at `index`.
pub fn image_field(index: usize) -> String {
    format!("property_attributes[property_photos_attributes][{}][image]", index)
}

/// Name of the display order field for the photo at `index`.
pub fn display_order_field(index: usize) -> String {
    format!(
        "property_attributes[property_photos_attributes][{}][display_order]",
        index
    )
}

/// Value of one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Streamed from disk as a file part.
    File(PathBuf),
    /// Sent as a plain text field.
    Text(String),
}

/// Ordered multipart fields for a single listing update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPayload {
    fields: Vec<(String, FieldValue)>,
}

impl UploadPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_file(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.fields.push((name.into(), FieldValue::File(path.into())));
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), FieldValue::Text(value.into())));
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Number of file fields in the payload.
    pub fn file_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|(_, v)| matches!(v, FieldValue::File(_)))
            .count()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON summary of the payload for logging. Files show as their path.
    pub fn describe(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            let v = match value {
                FieldValue::File(path) => json!({ "file": path.display().to_string() }),
                FieldValue::Text(text) => Value::String(text.clone()),
            };
            map.insert(name.clone(), v);
        }
        Value::Object(map)
    }

    pub fn into_fields(self) -> Vec<(String, FieldValue)> {
        self.fields
    }
}

/// Build the payload for one listing.
///
/// Each photo contributes an image field and a display order field at
/// its position in `photos`; the `listing_type` field comes last.
pub fn build_payload(listing_state: &str, photos: &[PhotoEntry]) -> UploadPayload {
    let mut payload = UploadPayload::new();
    for (index, photo) in photos.iter().enumerate() {
        payload.push_file(image_field(index), photo.file_path.clone());
        payload.push_text(display_order_field(index), index.to_string());
    }
    payload.push_text(LISTING_TYPE_FIELD, listing_state);
    payload
}
