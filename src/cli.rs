use std::path::{Path, PathBuf};

use crate::assets::{generate_npc_assets, load_appearance_lookup, GenerationSummary};
use crate::config::Settings;
use crate::data::dataset::Dataset;
use crate::error::Result;
use crate::outfit::{decode_outfiter_url, generate_outfits, OutfitRunSummary};
use crate::wiki::MediaWikiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Outfits,
    Npcs,
    Decode,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("outfits") => Some(Command::Outfits),
        Some("npcs") => Some(Command::Npcs),
        Some("decode") => Some(Command::Decode),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Outfits) => handle_outfits(args),
        Some(Command::Npcs) => handle_npcs(),
        Some(Command::Decode) => handle_decode(args),
        None => {
            eprintln!("usage: outfitter <outfits|npcs|decode>");
            2
        }
    }
}

/// Value following `flag`; `Err(())` when the flag is present without a value.
fn flag_value(args: &[String], flag: &str) -> std::result::Result<Option<PathBuf>, ()> {
    match args.iter().position(|arg| arg == flag) {
        None => Ok(None),
        Some(idx) => match args.get(idx + 1) {
            Some(value) if !value.starts_with("--") => Ok(Some(PathBuf::from(value))),
            _ => Err(()),
        },
    }
}

/// Run the outfit stage against the live wiki.
pub fn run_outfits(settings: &Settings, report_path: Option<&Path>) -> Result<OutfitRunSummary> {
    let client = MediaWikiClient::new(&settings.api_url, &settings.user_agent)?;
    generate_outfits(&client, settings, report_path)
}

/// Run the NPC stage from the local dataset and the appearance map.
pub fn run_npcs(settings: &Settings) -> Result<GenerationSummary> {
    let lookup = load_appearance_lookup(&settings.outfits_json_path)?;
    let dataset = Dataset::open(&settings.dataset_path)?;
    Ok(generate_npc_assets(&dataset, &lookup, &settings.output_dir)?)
}

fn handle_outfits(args: &[String]) -> i32 {
    let Ok(report_path) = flag_value(args, "--report") else {
        eprintln!("usage: outfitter outfits [--report <path.csv>]");
        return 2;
    };
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };

    match run_outfits(&settings, report_path.as_deref()) {
        Ok(summary) => {
            println!(
                "outfits complete: rows={}, skipped={}, entries={}, output='{}'",
                summary.rows_resolved,
                summary.rows_skipped,
                summary.entries_written,
                summary.output_path
            );
            0
        }
        Err(err) => {
            eprintln!("outfit generation failed: {err}");
            1
        }
    }
}

fn handle_npcs() -> i32 {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };

    match run_npcs(&settings) {
        Ok(summary) => {
            println!(
                "npcs complete: npcs={}, shops={}, mapped_looks={}, output='{}'",
                summary.npcs_written,
                summary.shops_written,
                summary.looks_mapped,
                summary.output_root
            );
            0
        }
        Err(err) => {
            eprintln!("npc generation failed: {err}");
            1
        }
    }
}

fn handle_decode(args: &[String]) -> i32 {
    let Some(url) = args.get(2) else {
        eprintln!("usage: outfitter decode <outfiter-url>");
        return 2;
    };

    match serde_json::to_string_pretty(&decode_outfiter_url(url)) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize descriptor: {err}");
            1
        }
    }
}
