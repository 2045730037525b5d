//! Scraper configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use devpost_scrape::Selectors;
use serde::{Deserialize, Serialize};

use crate::user_agent::get_user_agent;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown engine '{0}'. Valid values: chrome, http")]
    UnknownEngine(String),
}

/// How pages are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Headless Chromium over the DevTools protocol.
    #[default]
    Chrome,
    /// Plain HTTP GET of the server-rendered markup.
    Http,
}

impl FromStr for Engine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Self::Chrome),
            "http" => Ok(Self::Http),
            _ => Err(ConfigError::UnknownEngine(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub engine: Engine,
    /// Parent of the per-run diagnostics directories.
    pub debug_root: PathBuf,
    /// Bound on the wait for gallery entries to render.
    pub gallery_timeout_secs: u64,
    pub page_timeout_secs: u64,
    /// Settle time after a detail page finishes navigating.
    pub network_idle_ms: u64,
    pub viewport: Viewport,
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    pub user_agent: Option<String>,
    pub selectors: Selectors,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            debug_root: PathBuf::from("debug"),
            gallery_timeout_secs: 60,
            page_timeout_secs: 30,
            network_idle_ms: 750,
            viewport: Viewport::default(),
            headless: true,
            chrome_executable: None,
            user_agent: None,
            selectors: Selectors::default(),
        }
    }
}

impl ScraperConfig {
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

    pub fn gallery_timeout(&self) -> Duration {
        Duration::from_secs(self.gallery_timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }

    /// The configured agent, or a randomly picked desktop browser agent.
    pub fn resolved_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| get_user_agent().to_string())
    }
}
