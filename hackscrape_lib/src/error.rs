//! Error types for the library layer.

use std::fmt;

use crate::config::ConfigError;
use crate::db::DbError;
use crate::fetch::FetchError;

/// Errors that abort a whole scrape run or a read query.
///
/// Per-project failures never show up here; they are folded into the run
/// summary instead.
#[derive(Debug)]
pub enum HackscrapeError {
    /// Browser launch, gallery navigation or gallery content wait failed.
    Fetch(FetchError),
    /// A page could not be handed to the extractors.
    Extract(devpost_scrape::Error),
    /// A storage operation failed.
    Db(DbError),
    /// The configuration file could not be loaded.
    Config(ConfigError),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for HackscrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "Fetch error: {}", e),
            Self::Extract(e) => write!(f, "Extraction error: {}", e),
            Self::Db(e) => write!(f, "Database error: {}", e),
            Self::Config(e) => write!(f, "Config error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for HackscrapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Extract(e) => Some(e),
            Self::Db(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<FetchError> for HackscrapeError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

impl From<devpost_scrape::Error> for HackscrapeError {
    fn from(e: devpost_scrape::Error) -> Self {
        Self::Extract(e)
    }
}

impl From<DbError> for HackscrapeError {
    fn from(e: DbError) -> Self {
        Self::Db(e)
    }
}

impl From<ConfigError> for HackscrapeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
