//! Hackathon lists for batch scrapes.

use std::path::Path;
use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

use crate::config::ConfigError;
use crate::error::HackscrapeError;
use crate::scrape::ScrapeRequest;

pub const DEFAULT_BATCH_LIMIT: i64 = 30;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 1000;
const MAX_JITTER_MS: u64 = 250;

/// A TOML list of hackathons:
///
/// ```toml
/// [defaults]
/// limit = 30
/// delay_ms = 1000
///
/// [[hackathons]]
/// url = "https://hackthenorth2024.devpost.com"
/// name = "Hack the North 2024"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct BatchFile {
    #[serde(default)]
    pub defaults: BatchDefaults,
    #[serde(default)]
    pub hackathons: Vec<BatchEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchDefaults {
    pub limit: Option<i64>,
    /// Pause between two hackathons.
    pub delay_ms: u64,
}

impl Default for BatchDefaults {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_BATCH_LIMIT),
            delay_ms: DEFAULT_BATCH_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchEntry {
    pub url: String,
    pub name: String,
    /// Overrides the batch-wide limit.
    pub limit: Option<i64>,
}

impl BatchFile {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// One validated request per entry, in file order.
    pub fn requests(&self) -> Vec<Result<ScrapeRequest, HackscrapeError>> {
        self.hackathons
            .iter()
            .map(|entry| {
                ScrapeRequest::new(&entry.url, &entry.name, entry.limit.or(self.defaults.limit))
            })
            .collect()
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.defaults.delay_ms)
    }
}

/// `base` plus up to a quarter second of random jitter.
pub fn jittered(base: Duration) -> Duration {
    base + Duration::from_millis(rand::thread_rng().gen_range(0..=MAX_JITTER_MS))
}
