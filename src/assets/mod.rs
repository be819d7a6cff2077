//! Server-side NPC files generated from the local dataset and the appearance map.
//!
//! Every NPC gets `<out>/<city>/<npc>.xml` and `<out>/<city>/scripts/<npc>.lua`;
//! NPCs with at least one tradeable offer also get `<out>/<city>/shops/<npc>.shop`.

mod look;
mod render;
mod slug;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::dataset::{Dataset, DatasetError, NpcOffer, OfferKind};
use crate::outfit::load_appearance_json;

pub use look::{AppearanceLookup, NpcLook, DEFAULT_LOOK};
pub use render::{
    build_shop_value, render_lua_script, render_npc_xml, render_shop_xml, script_file,
    shop_file, HomePosition, ShopEntry,
};
pub use slug::{slugify_city, slugify_name, xml_escape_attr};

pub const DEFAULT_OUTPUT_ROOT: &str = "output";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("unable to read appearance map {path}: {source}")]
    Appearance {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub npcs_written: usize,
    pub shops_written: usize,
    /// NPCs that got a look from the appearance map instead of the default.
    pub looks_mapped: usize,
    pub output_root: String,
}

/// City folder plus its `scripts/` and `shops/` subfolders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityDirs {
    pub root: PathBuf,
    pub scripts: PathBuf,
    pub shops: PathBuf,
}

fn write_file(path: &Path, contents: &str) -> Result<(), AssetError> {
    fs::write(path, contents).map_err(|source| AssetError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn ensure_city_dirs(output_root: &Path, city_slug: &str) -> Result<CityDirs, AssetError> {
    let root = output_root.join(city_slug);
    let dirs = CityDirs {
        scripts: root.join("scripts"),
        shops: root.join("shops"),
        root,
    };
    for dir in [&dirs.root, &dirs.scripts, &dirs.shops] {
        fs::create_dir_all(dir).map_err(|source| AssetError::Io {
            path: dir.display().to_string(),
            source,
        })?;
    }
    Ok(dirs)
}

/// Appearance lookup for the NPC run. A missing file means every NPC gets the default look.
pub fn load_appearance_lookup(path: impl AsRef<Path>) -> Result<AppearanceLookup, AssetError> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "appearance map not found; using the default look for every NPC");
        return Ok(AppearanceLookup::default());
    }
    let map = load_appearance_json(path).map_err(|source| AssetError::Appearance {
        path: path.display().to_string(),
        source,
    })?;
    Ok(AppearanceLookup::from_map(map))
}

/// Shop entries for one side of an NPC's trade list. Offers whose item is
/// unknown or has no client id are dropped.
fn shop_entries(dataset: &Dataset, offers: &[NpcOffer]) -> Result<Vec<ShopEntry>, AssetError> {
    let mut entries = Vec::with_capacity(offers.len());
    for offer in offers {
        let Some(item) = dataset.item(offer.item_id)? else {
            debug!(item_id = offer.item_id, "offer item not in dataset; skipping");
            continue;
        };
        let Some(client_id) = item.client_id else {
            debug!(item = %item.title, "item has no client id; skipping offer");
            continue;
        };
        let name = [item.actual_name.as_deref(), item.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .unwrap_or(&offer.item_title)
            .to_lowercase();
        entries.push(ShopEntry {
            name,
            client_id,
            price: offer.value,
        });
    }
    Ok(entries)
}

/// Write the files of every NPC in the dataset under `output_root`.
pub fn generate_npc_assets(
    dataset: &Dataset,
    lookup: &AppearanceLookup,
    output_root: &Path,
) -> Result<GenerationSummary, AssetError> {
    let npc_ids = dataset.npc_ids()?;
    info!(npcs = npc_ids.len(), "found NPCs in the dataset");

    let mut summary = GenerationSummary {
        output_root: output_root.display().to_string(),
        ..GenerationSummary::default()
    };

    for npc_id in npc_ids {
        let Some(npc) = dataset.npc(npc_id)? else {
            continue;
        };
        let npc_name = npc.display_name().to_string();
        let file_base = slugify_name(&npc_name);
        let city_slug = slugify_city(npc.city.as_deref().unwrap_or(""));
        let dirs = ensure_city_dirs(output_root, &city_slug)?;

        let look = match lookup.get(&npc_name) {
            Some(descriptor) => {
                summary.looks_mapped += 1;
                NpcLook::from_descriptor(descriptor)
            }
            None => DEFAULT_LOOK,
        };

        let buyable = shop_entries(dataset, &dataset.offers(npc_id, OfferKind::Sell)?)?;
        let sellable = shop_entries(dataset, &dataset.offers(npc_id, OfferKind::Buy)?)?;
        let has_shop = !buyable.is_empty() || !sellable.is_empty();

        let home = HomePosition::from_optional(npc.x, npc.y, npc.z);
        write_file(
            &dirs.root.join(format!("{file_base}.xml")),
            &render_npc_xml(&npc_name, &file_base, &look, home, has_shop),
        )?;
        if has_shop {
            write_file(
                &dirs.shops.join(format!("{file_base}.shop")),
                &render_shop_xml(&buyable, &sellable),
            )?;
            summary.shops_written += 1;
        }
        write_file(
            &dirs.scripts.join(format!("{file_base}.lua")),
            &render_lua_script(&npc_name),
        )?;
        summary.npcs_written += 1;

        info!(
            npc = %npc_name,
            city = %city_slug,
            look_type = look.look_type,
            shop = has_shop,
            "generated NPC"
        );
    }

    info!(
        npcs = summary.npcs_written,
        shops = summary.shops_written,
        mapped = summary.looks_mapped,
        root = %summary.output_root,
        "NPC generation finished"
    );
    Ok(summary)
}
