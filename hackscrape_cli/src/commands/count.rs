//! The `count` subcommand.

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use super::open_db;
use crate::output::{print_json, OutputFormat};

pub fn run(db_path: &Path, format: &OutputFormat) -> Result<()> {
    let count = open_db(db_path)?.project_count()?;
    match format {
        OutputFormat::Json => print_json(&json!({ "count": count })),
        _ => println!("{}", count),
    }
    Ok(())
}
