//! The `projects` subcommand: read stored projects.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use hackscrape_lib::validation;

use super::open_db;
use crate::output::{
    print_json, print_projects_csv, print_projects_markdown, print_projects_table, OutputFormat,
};

#[derive(Args)]
pub struct ProjectsArgs {
    /// Show N random projects instead of all (1-100, default 10)
    #[arg(long, num_args = 0..=1, default_missing_value = "10")]
    pub random: Option<i64>,
}

pub fn run(args: &ProjectsArgs, db_path: &Path, format: &OutputFormat) -> Result<()> {
    let db = open_db(db_path)?;
    let projects = match args.random {
        Some(n) => db.random_projects(validation::validate_sample_size(n)?)?,
        None => db.list_projects()?,
    };

    if projects.is_empty() {
        eprintln!("No projects stored yet. Run 'hackscrape scrape' first.");
    } else {
        eprintln!("{} projects", projects.len());
    }

    match format {
        OutputFormat::Table => print_projects_table(&projects),
        OutputFormat::Markdown => print_projects_markdown(&projects),
        OutputFormat::Csv => print_projects_csv(&projects)?,
        OutputFormat::Json => print_json(&projects),
    }
    Ok(())
}
