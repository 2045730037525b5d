//! Library layer for hackscrape: Devpost hackathon winner scraping.
//!
//! Drives a page fetcher (headless Chromium or plain HTTP) through a
//! hackathon's project gallery and its winners' detail pages, extracts
//! structured records with `devpost_scrape`, and upserts them into SQLite.

pub mod batch;
pub mod config;
pub mod db;
pub mod diagnostics;
pub mod error;
pub mod fetch;
pub mod record;
pub mod scrape;
pub mod user_agent;
pub mod validation;

pub use devpost_scrape;
pub use devpost_scrape::types;

pub use batch::BatchFile;
pub use config::{ConfigError, Engine, ScraperConfig};
pub use db::{Db, DbError};
pub use diagnostics::{DebugDir, DiagnosticsSink, NoDiagnostics};
pub use error::HackscrapeError;
pub use fetch::{FetchError, FetchedPage, PageFetcher};
pub use record::ProjectRecord;
pub use scrape::{
    scrape_hackathon, CandidateOutcome, RunState, ScrapeRequest, ScrapeSummary, Scraper,
};
