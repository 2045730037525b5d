//! The `scrape` subcommand: one hackathon, one run.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use hackscrape_lib::{scrape_hackathon, ScrapeRequest};

use super::{load_config, open_db, EngineArgs};
use crate::output::{print_json, print_summaries, OutputFormat, SummaryRow};

#[derive(Args)]
pub struct ScrapeArgs {
    /// Hackathon base URL, e.g. https://hackthenorth2024.devpost.com
    pub url: String,

    /// Display name stored with every project
    #[arg(long)]
    pub name: String,

    /// Maximum number of winners to visit
    #[arg(long)]
    pub limit: Option<i64>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

pub async fn run(
    args: &ScrapeArgs,
    db_path: &Path,
    config_path: Option<&Path>,
    format: &OutputFormat,
) -> Result<()> {
    let request = ScrapeRequest::new(&args.url, &args.name, args.limit)?;
    let config = load_config(config_path, &args.engine)?;
    let db = open_db(db_path)?;

    let summary = scrape_hackathon(&request, &config, &db).await?;

    match format {
        OutputFormat::Json => print_json(&summary),
        _ => print_summaries(&[SummaryRow::completed(&request, &summary)], format)?,
    }
    Ok(())
}
