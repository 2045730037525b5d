mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

const DEFAULT_DB: &str = "hackscrape.db";

#[derive(Parser)]
#[command(name = "hackscrape")]
#[command(about = "Scrape Devpost hackathon winners into SQLite")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// SQLite database path (default: $HACKSCRAPE_DB, then hackscrape.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Scraper config file in TOML (default: $HACKSCRAPE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the winners of one hackathon
    Scrape(commands::scrape::ScrapeArgs),
    /// Scrape every hackathon listed in a TOML file
    Batch(commands::batch::BatchArgs),
    /// List stored projects, newest first
    Projects(commands::projects::ProjectsArgs),
    /// Print the number of stored projects
    Count,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hackscrape=info".parse().unwrap())
                .add_directive("hackscrape_lib=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "md" | "markdown" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let db_path = cli
        .db
        .or_else(|| std::env::var_os("HACKSCRAPE_DB").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));
    let config_path = cli
        .config
        .or_else(|| std::env::var_os("HACKSCRAPE_CONFIG").map(PathBuf::from));

    match &cli.command {
        Commands::Scrape(args) => {
            commands::scrape::run(args, &db_path, config_path.as_deref(), &format).await?
        }
        Commands::Batch(args) => {
            commands::batch::run(args, &db_path, config_path.as_deref(), &format).await?
        }
        Commands::Projects(args) => commands::projects::run(args, &db_path, &format)?,
        Commands::Count => commands::count::run(&db_path, &format)?,
    }

    Ok(())
}
