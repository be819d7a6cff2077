//! Scrape the wiki's "NPC Outfitter Codes" page and write outfits.json.
//! Paths and endpoints come from outfitter.yaml / OUTFITTER_* variables.
//! Optional first argument: path of a CSV resolution report.

use std::path::PathBuf;

use outfitter::cli::run_outfits;
use outfitter::config::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load()?;
    let report_path = std::env::args().nth(1).map(PathBuf::from);
    let summary = run_outfits(&settings, report_path.as_deref())?;

    println!(
        "Wrote {} entries to {} ({} rows, {} skipped)",
        summary.entries_written, summary.output_path, summary.rows_resolved, summary.rows_skipped
    );
    Ok(())
}
