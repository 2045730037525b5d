//! CLI subcommand implementations.

pub mod batch;
pub mod count;
pub mod projects;
pub mod scrape;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use hackscrape_lib::{Db, Engine, ScraperConfig};

/// Scraper settings that can be overridden per invocation.
#[derive(Args, Clone, Default)]
pub struct EngineArgs {
    /// Page engine: chrome or http
    #[arg(long)]
    pub engine: Option<String>,

    /// Directory for per-run diagnostics
    #[arg(long)]
    pub debug_root: Option<std::path::PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,
}

/// Loads the config file (or defaults) and applies command-line overrides.
pub fn load_config(path: Option<&Path>, overrides: &EngineArgs) -> Result<ScraperConfig> {
    let mut config = match path {
        Some(path) => ScraperConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScraperConfig::default(),
    };
    if let Some(engine) = &overrides.engine {
        config.engine = engine.parse::<Engine>()?;
    }
    if let Some(root) = &overrides.debug_root {
        config.debug_root = root.clone();
    }
    if overrides.headful {
        config.headless = false;
    }
    Ok(config)
}

/// Opens the database and applies the schema.
pub fn open_db(path: &Path) -> Result<Db> {
    let db = Db::open(path).with_context(|| format!("opening database {}", path.display()))?;
    db.init()?;
    Ok(db)
}
