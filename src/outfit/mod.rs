//! Outfit resolution: turns the wiki's "NPC Outfitter Codes" table into one
//! [AppearanceDescriptor] per NPC name.

mod descriptor;
mod map;
mod pipeline;
mod query;
mod report;
mod resolver;
mod rows;
mod template;

pub use descriptor::{is_truthy_flag, AppearanceDescriptor, Gender, ADDON_FIRST, ADDON_SECOND};
pub use map::{load_appearance_json, AppearanceMap, DEFAULT_OUTFITS_JSON_PATH};
pub use pipeline::{generate_outfits, resolve_outfits, OutfitRunSummary};
pub use query::decode_outfiter_url;
pub use report::{render_report, write_report, REPORT_HEADER};
pub use resolver::{
    absolutize_link, alias_without_npc_qualifier, OutfitResolver, Resolution, ResolutionRecord,
    ResolutionSource, DEFAULT_WIKI_BASE_URL,
};
pub use rows::{extract_rows, OutfitterRow};
pub use template::{parse_template_params, TemplateParams};
