// Batch driver: runs read → locate → build → upload for every manifest
// row, strictly one row at a time.
//
// Manifest errors end the run. Everything that goes wrong inside a row
// is logged and reported, then the next row starts.

use crate::api::UploadClient;
use crate::config::{Config, Environment};
use crate::error::{ManifestError, UploadError};
use crate::form::build_payload;
use crate::manifest::ManifestRow;
use crate::photos::locate_photos;
use crate::ui;
use indicatif::ProgressBar;
use log::{debug, info, warn};

/// Per-run counters. Printed at the end, never persisted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Rows handed to the upload client.
    pub attempted: usize,
    /// Requests answered with a 2xx status.
    pub succeeded: usize,
    /// Requests answered with any other status.
    pub rejected: usize,
    /// Requests that could not be built or sent.
    pub failed: usize,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.attempted
    }
}

/// How a single row ended.
#[derive(Debug)]
pub enum RowOutcome {
    Accepted,
    Rejected(reqwest::StatusCode),
    Failed(UploadError),
}

/// Process every row in `rows` against `environment`.
///
/// Returns the first manifest error, if any; rows before it have
/// already been uploaded.
pub fn run_batch<I>(
    rows: I,
    config: &Config,
    environment: Environment,
    client: &UploadClient,
    progress: &ProgressBar,
) -> Result<BatchSummary, ManifestError>
where
    I: IntoIterator<Item = Result<ManifestRow, ManifestError>>,
{
    let mut summary = BatchSummary::default();

    for (index, row) in rows.into_iter().enumerate() {
        let row = row?;
        ui::report_row(progress, index + 1, &row);

        summary.attempted += 1;
        match process_row(&row, config, environment, client, progress) {
            RowOutcome::Accepted => summary.succeeded += 1,
            RowOutcome::Rejected(_) => summary.rejected += 1,
            RowOutcome::Failed(_) => summary.failed += 1,
        }
    }

    Ok(summary)
}

/// Upload the photos for one row. Never fails: problems are folded into
/// the returned outcome.
pub fn process_row(
    row: &ManifestRow,
    config: &Config,
    environment: Environment,
    client: &UploadClient,
    progress: &ProgressBar,
) -> RowOutcome {
    let photos = match locate_photos(&config.photo_root, &row.property_id) {
        Ok(photos) => photos,
        Err(e) => {
            warn!(
                "{:#}; uploading listing {} without photos",
                anyhow::Error::new(e),
                row.listing_id
            );
            Vec::new()
        }
    };

    let payload = build_payload(&row.listing_state, &photos);
    let url = config.listing_url(environment, &row.listing_id);
    info!(
        "Uploading {} photo(s) for property {} to {}",
        photos.len(),
        row.property_id,
        url
    );
    debug!("Payload: {}", payload.describe());

    match client.upload_listing(&url, payload, &row.auth_token) {
        Ok(outcome) => {
            if outcome.skipped_files > 0 {
                warn!(
                    "Listing {}: {} photo(s) could not be opened and were not sent",
                    row.listing_id, outcome.skipped_files
                );
            }
            if outcome.is_success() {
                info!("Listing {} updated ({})", row.listing_id, outcome.status);
                RowOutcome::Accepted
            } else {
                ui::report_status(progress, outcome.status);
                RowOutcome::Rejected(outcome.status)
            }
        }
        Err(e) => {
            ui::report_error(progress, &format!("listing {}", row.listing_id), &e);
            RowOutcome::Failed(e)
        }
    }
}
