// Runtime configuration: target environments, photo root and HTTP
// settings. Everything has a default so the tool runs with no setup;
// environment variables override the defaults.

use crate::error::ConfigError;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const STAGING_BASE_URL: &str = "https://staging.sohoapp.com/api";
pub const PRODUCTION_BASE_URL: &str = "https://app.sohoapp.com/api";
pub const DEFAULT_PHOTO_ROOT: &str = "./temp";

/// Path appended to the base URL, followed by `/<listing_id>`.
pub const MANAGE_LISTINGS_ENDPOINT: &str = "/manage/property_listings";

/// The remote environment a run targets. Chosen once, before the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Staging,
    Production,
}

impl Environment {
    /// Parse an operator choice. Accepts the prompt digits (`1`, `2`)
    /// as well as the names, case-insensitively.
    pub fn parse_choice(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "staging" => Some(Environment::Staging),
            "2" | "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub staging_url: String,
    pub production_url: String,
    /// Directory holding one subdirectory of photos per property.
    pub photo_root: PathBuf,
    /// Preselected environment; `None` means ask the operator.
    pub environment: Option<Environment>,
    /// HTTP timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            staging_url: STAGING_BASE_URL.into(),
            production_url: PRODUCTION_BASE_URL.into(),
            photo_root: PathBuf::from(DEFAULT_PHOTO_ROOT),
            environment: None,
            timeout: None,
        }
    }
}

impl Config {
    /// Build a config from the process environment. See `from_lookup`
    /// for the variables read.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Reads
    /// `UPLOADER_STAGING_URL`, `UPLOADER_PRODUCTION_URL`,
    /// `UPLOADER_PHOTO_ROOT`, `UPLOADER_ENV` and `UPLOADER_TIMEOUT_SECS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("UPLOADER_STAGING_URL") {
            config.staging_url = trim_base_url(&url);
        }
        if let Some(url) = lookup("UPLOADER_PRODUCTION_URL") {
            config.production_url = trim_base_url(&url);
        }
        if let Some(root) = lookup("UPLOADER_PHOTO_ROOT") {
            config.photo_root = PathBuf::from(root);
        }
        if let Some(env) = lookup("UPLOADER_ENV") {
            let parsed = Environment::parse_choice(&env).ok_or_else(|| ConfigError::InvalidValue {
                var: "UPLOADER_ENV",
                value: env.clone(),
                reason: "expected staging, production, 1 or 2".into(),
            })?;
            config.environment = Some(parsed);
        }
        if let Some(secs) = lookup("UPLOADER_TIMEOUT_SECS") {
            let parsed: u64 = secs.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    var: "UPLOADER_TIMEOUT_SECS",
                    value: secs.clone(),
                    reason: e.to_string(),
                }
            })?;
            config.timeout = Some(Duration::from_secs(parsed));
        }

        Ok(config)
    }

    pub fn base_url(&self, env: Environment) -> &str {
        match env {
            Environment::Staging => &self.staging_url,
            Environment::Production => &self.production_url,
        }
    }

    /// Full URL of the listing update endpoint for one listing.
    pub fn listing_url(&self, env: Environment, listing_id: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url(env),
            MANAGE_LISTINGS_ENDPOINT,
            listing_id
        )
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
