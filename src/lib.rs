// Library root
// -----------
// Batch uploader for property listing photos. The binary (`main.rs`)
// wires these modules together; each row of a manifest flows through
// them in order:
//
// - `manifest`: reads the CSV manifest, one `ManifestRow` per line.
// - `photos`: finds the `.jpg` files for a property, sorted by name.
// - `form`: lays out the multipart fields for one listing update.
// - `api`: sends the PUT request with the row's token.
// - `batch`: drives the rows and keeps the run summary.
// - `ui`: environment prompt and operator output.
// - `config` / `error`: settings from the environment and error types.
pub mod api;
pub mod batch;
pub mod config;
pub mod error;
pub mod form;
pub mod manifest;
pub mod photos;
pub mod ui;
