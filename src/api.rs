// Upload client: a small blocking HTTP client that sends one listing
// update per call to the management API.

use crate::config::Config;
use crate::error::UploadError;
use crate::form::{FieldValue, UploadPayload};
use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Blocking client for the listings endpoint. The token is passed per
/// call, never stored on the client.
#[derive(Clone)]
pub struct UploadClient {
    client: Client,
}

/// Result of a request that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOutcome {
    pub status: StatusCode,
    /// Image parts left out because their file could not be opened.
    pub skipped_files: usize,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl UploadClient {
    /// Create a client. `None` disables the request timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(UploadClient { client })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.timeout)
    }

    /// PUT `payload` to `url` as multipart/form-data, authenticated with
    /// `token`. Any HTTP status counts as a completed request; only
    /// request construction and transport failures are errors.
    ///
    /// The payload is consumed: files opened for it are owned by the
    /// request body and closed when this call returns.
    pub fn upload_listing(
        &self,
        url: &str,
        payload: UploadPayload,
        token: &str,
    ) -> Result<UploadOutcome, UploadError> {
        let mut auth = HeaderValue::from_str(token).map_err(|_| UploadError::InvalidToken)?;
        auth.set_sensitive(true);

        let (form, skipped_files) = encode_form(url, payload)?;

        let res = self
            .client
            .put(url)
            .header(AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .map_err(|source| UploadError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = res.status();
        debug!("PUT {} -> {}", url, status);
        Ok(UploadOutcome {
            status,
            skipped_files,
        })
    }
}

/// Turn a payload into a multipart form, opening each file field.
/// Files that fail to open are logged and left out.
fn encode_form(url: &str, payload: UploadPayload) -> Result<(multipart::Form, usize), UploadError> {
    // Field names carry brackets; send them as-is.
    let mut form = multipart::Form::new().percent_encode_noop();
    let mut skipped = 0;

    for (name, value) in payload.into_fields() {
        match value {
            FieldValue::Text(text) => {
                form = form.text(name, text);
            }
            FieldValue::File(path) => match file_part(&path) {
                Ok(part) => {
                    let part = part
                        .mime_str("image/jpeg")
                        .map_err(|source| UploadError::Request {
                            url: url.to_string(),
                            source,
                        })?;
                    form = form.part(name, part);
                }
                Err(e) => {
                    warn!("Skipping {}: {:#}", path.display(), e);
                    skipped += 1;
                }
            },
        }
    }

    Ok((form, skipped))
}

fn file_part(path: &Path) -> Result<multipart::Part> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("image.jpg")
        .to_string();
    Ok(multipart::Part::reader_with_length(file, len).file_name(file_name))
}
