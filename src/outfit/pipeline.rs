//! Whole outfit run: download the outfitter page, build both indices, resolve
//! every row and persist `outfits.json` (plus an optional CSV report).

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use super::resolver::{OutfitResolver, Resolution};
use super::rows::extract_rows;
use crate::config::Settings;
use crate::data::canonical::build_looktype_index;
use crate::data::dataset::Dataset;
use crate::data::reference::load_reference_catalogue;
use crate::error::{Error, Result};
use crate::outfit::report::render_report;
use crate::wiki::PageSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutfitRunSummary {
    pub rows_resolved: usize,
    pub rows_skipped: usize,
    pub entries_written: usize,
    pub output_path: String,
}

/// Fetch and resolve without writing anything.
///
/// All indices are complete before the first row is resolved. A missing
/// dataset or reference catalogue only narrows the sources; retrieval errors abort.
pub fn resolve_outfits<S: PageSource + ?Sized>(source: &S, settings: &Settings) -> Result<Resolution> {
    info!(page = %settings.outfitter_page, "downloading outfitter codes");
    let wikitext = source.fetch_page(&settings.outfitter_page)?;

    let catalogue_outfits = match Dataset::open_optional(&settings.dataset_path)? {
        Some(dataset) => dataset.outfits()?,
        None => Vec::new(),
    };
    info!(outfits = catalogue_outfits.len(), "building canonical lookType index");
    let canonical = build_looktype_index(source, &catalogue_outfits)?;
    let reference = load_reference_catalogue(&settings.outfits_xml_path)?;
    info!(
        canonical = canonical.len(),
        reference = reference.len(),
        "indices ready"
    );

    let resolver = OutfitResolver::new(&canonical, &reference, &settings.wiki_base_url);
    let resolution = resolver.resolve_rows(extract_rows(&wikitext));
    info!(
        rows = resolution.records.len(),
        skipped = resolution.skipped_rows,
        entries = resolution.map.len(),
        "resolved outfitter rows"
    );
    Ok(resolution)
}

fn write_output(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// Resolve and write the appearance map to `settings.outfits_json_path`.
///
/// Both outputs are serialized before either is written, and the report goes
/// first, so a failed run never replaces an existing `outfits.json`.
pub fn generate_outfits<S: PageSource + ?Sized>(
    source: &S,
    settings: &Settings,
    report_path: Option<&Path>,
) -> Result<OutfitRunSummary> {
    let resolution = resolve_outfits(source, settings)?;

    let output_path = settings.outfits_json_path.display().to_string();
    let payload = resolution
        .map
        .to_json_pretty()
        .map_err(|err| Error::Write {
            path: output_path.clone(),
            source: io::Error::other(err),
        })?;

    if let Some(report_path) = report_path {
        let report_error = |source: csv::Error| Error::Report {
            path: report_path.display().to_string(),
            source,
        };
        let report = render_report(&resolution.records).map_err(report_error)?;
        write_output(report_path, &report).map_err(|err| report_error(err.into()))?;
        info!(path = %report_path.display(), "wrote resolution report");
    }

    write_output(&settings.outfits_json_path, payload.as_bytes()).map_err(|source| {
        Error::Write {
            path: output_path.clone(),
            source,
        }
    })?;
    info!(path = %output_path, entries = resolution.map.len(), "wrote appearance map");

    Ok(OutfitRunSummary {
        rows_resolved: resolution.records.len(),
        rows_skipped: resolution.skipped_rows,
        entries_written: resolution.map.len(),
        output_path,
    })
}
