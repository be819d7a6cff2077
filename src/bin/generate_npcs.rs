//! Generate NPC XML, shop and Lua files from tibiawiki.db and outfits.json.
//! Paths come from outfitter.yaml / OUTFITTER_* variables.

use outfitter::cli::run_npcs;
use outfitter::config::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load()?;
    let summary = run_npcs(&settings)?;

    println!(
        "Done. {} NPCs ({} with shops) written under: {}",
        summary.npcs_written, summary.shops_written, summary.output_root
    );
    Ok(())
}
