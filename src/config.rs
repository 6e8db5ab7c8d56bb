//! Settings for the remote submissions API.
//!
//! Resolution order, highest first:
//! 1. Command-line flag
//! 2. Environment variable (`MATERIALITY_ENDPOINT`, `MATERIALITY_REPORT_ID`)
//! 3. TOML config file (`materiality.toml`, or `--config <path>`)
//! 4. Built-in default

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::RatingType;

pub const DEFAULT_CONFIG_FILE: &str = "materiality.toml";
pub const ENDPOINT_ENV: &str = "MATERIALITY_ENDPOINT";
pub const REPORT_ID_ENV: &str = "MATERIALITY_REPORT_ID";
const DEFAULT_TOKEN_ENV: &str = "MATERIALITY_TOKEN";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub endpoint: Option<String>,
    pub report_id: Option<String>,
    pub rating_type: RatingType,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            report_id: None,
            rating_type: RatingType::Stakeholder,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
        }
    }
}

/// Command-line values that override the file and environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub report_id: Option<String>,
    pub rating_type: Option<RatingType>,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load `path` if given (it must exist), otherwise `materiality.toml` in
    /// the working directory if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !path.exists() {
            if required {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }
        debug!(path = %path.display(), "loading config");
        let text = std::fs::read_to_string(&path)?;
        Self::from_toml(&text)
    }

    /// Lens for commands that never reach the API. An explicit flag is used
    /// as is and no config file is read.
    pub fn local_rating_type(flag: Option<RatingType>, path: Option<&Path>) -> Result<RatingType> {
        match flag {
            Some(rating_type) => Ok(rating_type),
            None => Ok(Self::load(path)?.rating_type),
        }
    }

    /// Apply environment variables, then command-line overrides.
    pub fn resolve(mut self, overrides: Overrides) -> Self {
        if let Ok(v) = std::env::var(ENDPOINT_ENV) {
            self.endpoint = Some(v);
        }
        if let Ok(v) = std::env::var(REPORT_ID_ENV) {
            self.report_id = Some(v);
        }
        if overrides.endpoint.is_some() {
            self.endpoint = overrides.endpoint;
        }
        if overrides.report_id.is_some() {
            self.report_id = overrides.report_id;
        }
        if let Some(rt) = overrides.rating_type {
            self.rating_type = rt;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env).ok().filter(|t| !t.is_empty())
    }

    pub fn require_endpoint(&self) -> Result<&str> {
        self.endpoint.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "no API endpoint configured (set `endpoint` in {DEFAULT_CONFIG_FILE}, \
                 {ENDPOINT_ENV}, or --endpoint)"
            ))
        })
    }

    pub fn require_report_id(&self) -> Result<&str> {
        self.report_id.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "no report id configured (set `report_id` in {DEFAULT_CONFIG_FILE}, \
                 {REPORT_ID_ENV}, or --report-id)"
            ))
        })
    }
}
