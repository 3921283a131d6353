// Entrypoint for the uploader.
// - Validates the manifest argument, resolves the target environment and
//   hands the rows to the batch driver.
// - Fatal errors (bad invocation, unreadable or malformed manifest)
//   bubble up as `anyhow::Error` and exit non-zero.

use anyhow::{Context, Result};
use listing_photo_uploader::{
    api::UploadClient,
    batch::run_batch,
    config::Config,
    manifest::{looks_like_manifest, ManifestReader},
    ui,
};
use log::info;
use std::path::PathBuf;

const USAGE: &str = "usage: listing-photo-uploader <manifest.csv>";

fn main() -> Result<()> {
    let progress = ui::row_spinner();
    ui::init_logging(&progress);

    let manifest_path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => anyhow::bail!("missing manifest path\n{}", USAGE),
    };
    if !looks_like_manifest(&manifest_path) {
        anyhow::bail!(
            "{} does not look like a CSV manifest\n{}",
            manifest_path.display(),
            USAGE
        );
    }

    let config = Config::from_env().context("Invalid configuration")?;

    // Open before prompting so a bad path fails without interaction.
    let manifest = ManifestReader::open(&manifest_path)?;

    let environment = match config.environment {
        Some(env) => env,
        None => ui::prompt_environment()?,
    };
    info!(
        "Uploading to {} ({})",
        environment,
        config.base_url(environment)
    );

    let client = UploadClient::from_config(&config)?;
    ui::start_spinner(&progress);
    let result = run_batch(manifest, &config, environment, &client, &progress);
    progress.finish_and_clear();

    let summary = result.context("Aborting run: manifest could not be read")?;
    ui::print_summary(&summary);
    Ok(())
}
