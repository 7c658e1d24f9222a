//! Convert the claims spreadsheet into the table embedded by the dashboard.
//!
//! Usage: `convert_claims [INPUT] [OUTPUT]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use cpt_dashboard::data::loader::{self, EMBEDDED_PATH};
use cpt_dashboard::ColumnMapping;

const DEFAULT_INPUT: &str = "Collections by CPT Code Georgia - merged.xlsx";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args_os().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(EMBEDDED_PATH));

    let table = loader::convert(&input, &output)
        .with_context(|| format!("converting {}", input.display()))?;

    let mapping = ColumnMapping::default();
    let missing = mapping.missing_from(&table);
    if !missing.is_empty() {
        log::warn!("The dashboard will not render this table; missing columns: {missing:?}");
    }
    for (column, nulls) in table.null_counts() {
        if nulls > 0 {
            log::info!("{column}: {nulls} of {} cells are null", table.len());
        }
    }

    println!(
        "Wrote {} rows from {} to {}",
        table.len(),
        input.display(),
        output.display()
    );
    Ok(())
}
