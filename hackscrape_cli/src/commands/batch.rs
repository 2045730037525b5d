//! The `batch` subcommand: scrape a list of hackathons in sequence.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use hackscrape_lib::batch::jittered;
use hackscrape_lib::{scrape_hackathon, BatchFile};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;

use super::{load_config, open_db, EngineArgs};
use crate::output::{print_json, print_summaries, OutputFormat, SummaryRow};

#[derive(Args)]
pub struct BatchArgs {
    /// TOML file with [[hackathons]] entries
    #[arg(default_value = "seed_data/hackathons.toml")]
    pub file: PathBuf,

    /// Limit applied to entries without their own
    #[arg(long)]
    pub limit: Option<i64>,

    /// Pause between hackathons in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

pub async fn run(
    args: &BatchArgs,
    db_path: &Path,
    config_path: Option<&Path>,
    format: &OutputFormat,
) -> Result<()> {
    let mut batch = BatchFile::load(&args.file)?;
    if let Some(limit) = args.limit {
        batch.defaults.limit = Some(limit);
    }
    if let Some(delay) = args.delay_ms {
        batch.defaults.delay_ms = delay;
    }
    if batch.hackathons.is_empty() {
        eprintln!("No hackathons listed in {}", args.file.display());
        return Ok(());
    }

    let config = load_config(config_path, &args.engine)?;
    let db = open_db(db_path)?;
    let requests = batch.requests();
    eprintln!("Scraping {} hackathons", requests.len());

    let pb = ProgressBar::new(requests.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap(),
    );

    let mut rows = Vec::with_capacity(requests.len());
    for (i, (entry, request)) in batch.hackathons.iter().zip(requests).enumerate() {
        pb.set_message(entry.name.clone());
        let row = match request {
            Ok(request) => match scrape_hackathon(&request, &config, &db).await {
                Ok(summary) => SummaryRow::completed(&request, &summary),
                Err(e) => {
                    pb.println(format!("{} failed: {}", entry.name, e));
                    SummaryRow::failed(&entry.name, &entry.url, &e.to_string())
                }
            },
            Err(e) => {
                pb.println(format!("{} skipped: {}", entry.name, e));
                SummaryRow::failed(&entry.name, &entry.url, &e.to_string())
            }
        };
        rows.push(row);
        pb.inc(1);

        if i + 1 < batch.hackathons.len() {
            sleep(jittered(batch.delay())).await;
        }
    }
    pb.finish_with_message("done");

    let failed = rows.iter().filter(|r| r.status != "ok").count();
    eprintln!(
        "{} of {} hackathons scraped successfully",
        rows.len() - failed,
        rows.len()
    );

    match format {
        OutputFormat::Json => print_json(&rows),
        _ => print_summaries(&rows, format)?,
    }
    Ok(())
}
