//! Resolves scraped outfiter rows into appearance descriptors.
//!
//! Per row: decode the link, fill gaps from the template block, then map the
//! lookType to a catalogue outfit. Catalogue resolution tries, in order:
//!   1. the canonical index built from the local dataset and outfit infoboxes,
//!   2. the reference catalogue's direct lookType index,
//!   3. the legacy ordinal heuristic: small wiki ids are often the position of the
//!      outfit within its sex block of the reference catalogue.
//! Nothing in here fails; bad fragments are dropped and the row still resolves.

use std::rc::Rc;

use serde::Serialize;
use tracing::debug;

use super::descriptor::{AppearanceDescriptor, Gender, ADDON_FIRST, ADDON_SECOND};
use super::map::AppearanceMap;
use super::query::decode_outfiter_url;
use super::rows::OutfitterRow;
use super::template::{parse_template_params, TemplateParams};
use crate::data::canonical::CanonicalLookTypeIndex;
use crate::data::reference::ReferenceCatalogue;

pub const DEFAULT_WIKI_BASE_URL: &str = "https://tibia.fandom.com";

const NPC_QUALIFIER: &str = "(NPC)";

/// Sex block used by the ordinal heuristic when nothing else told us the sex.
/// Historical convention of the wiki data; do not reuse it for other defaults.
const ORDINAL_FALLBACK_SEX: Gender = Gender::Female;

/// Which source produced the catalogue fields of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    Canonical,
    Reference,
    Ordinal,
    /// A lookType was seen but matched nothing; only `outfit_id` was filled.
    Raw,
    /// No lookType at all.
    None,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::Reference => "reference",
            Self::Ordinal => "ordinal",
            Self::Raw => "raw",
            Self::None => "none",
        }
    }
}

/// One resolved row, kept in scrape order for reporting.
#[derive(Debug, Clone)]
pub struct ResolutionRecord {
    pub name: String,
    pub descriptor: Rc<AppearanceDescriptor>,
    pub source: ResolutionSource,
}

/// Result of resolving a whole page.
#[derive(Debug, Default)]
pub struct Resolution {
    pub map: AppearanceMap,
    pub records: Vec<ResolutionRecord>,
    pub skipped_rows: usize,
}

/// Name without a trailing `(NPC)` qualifier, e.g. `Akananto (NPC)` -> `Akananto`.
pub fn alias_without_npc_qualifier(name: &str) -> &str {
    let trimmed = name.trim_end();
    trimmed
        .strip_suffix(NPC_QUALIFIER)
        .unwrap_or(trimmed)
        .trim()
}

/// Turn protocol-relative and root-relative links into absolute URLs.
pub fn absolutize_link(link: &str, wiki_base_url: &str) -> String {
    if link.starts_with("//") {
        format!("https:{link}")
    } else if link.starts_with('/') {
        format!("{}{link}", wiki_base_url.trim_end_matches('/'))
    } else {
        link.to_string()
    }
}

/// Read-only view over the indices, shared by every row of a run.
#[derive(Debug, Clone, Copy)]
pub struct OutfitResolver<'a> {
    canonical: &'a CanonicalLookTypeIndex,
    reference: &'a ReferenceCatalogue,
    wiki_base_url: &'a str,
}

impl<'a> OutfitResolver<'a> {
    pub fn new(
        canonical: &'a CanonicalLookTypeIndex,
        reference: &'a ReferenceCatalogue,
        wiki_base_url: &'a str,
    ) -> Self {
        Self {
            canonical,
            reference,
            wiki_base_url,
        }
    }

    /// Resolve one row. `None` when the row has no link.
    pub fn resolve_row(
        &self,
        row: &OutfitterRow<'_>,
    ) -> Option<(AppearanceDescriptor, ResolutionSource)> {
        if row.link.is_empty() {
            return None;
        }
        let link = absolutize_link(row.link, self.wiki_base_url);
        let mut descriptor = decode_outfiter_url(&link);
        let params = parse_template_params(row.template);

        apply_template_fallbacks(&mut descriptor, &params);
        let source = self.resolve_catalogue(&mut descriptor);
        Some((descriptor, source))
    }

    fn resolve_catalogue(&self, descriptor: &mut AppearanceDescriptor) -> ResolutionSource {
        let Some(look_type) = descriptor.look_type else {
            return ResolutionSource::None;
        };

        if let Some(entry) = self.canonical.get(look_type) {
            descriptor.outfit_id = Some(entry.catalogue_id);
            descriptor.outfit_name = Some(entry.name.clone());
            descriptor.set_gender_if_unknown(Some(entry.sex));
            return ResolutionSource::Canonical;
        }

        if let Some(entry) = self.reference.get(look_type) {
            descriptor.outfit_name = Some(entry.name.clone());
            descriptor.set_gender_if_unknown(Some(entry.sex));
            descriptor.outfit_id = Some(look_type);
            return ResolutionSource::Reference;
        }

        let sex = descriptor.gender.unwrap_or(ORDINAL_FALLBACK_SEX);
        let position = usize::try_from(look_type).ok();
        match position.and_then(|position| self.reference.nth(sex, position)) {
            Some(entry) => {
                descriptor.look_type = Some(entry.look_type);
                descriptor.outfit_id = Some(entry.look_type);
                descriptor.outfit_name = Some(entry.name.clone());
                descriptor.gender = Some(sex);
                ResolutionSource::Ordinal
            }
            None => {
                descriptor.outfit_id = Some(look_type);
                ResolutionSource::Raw
            }
        }
    }

    /// Resolve every row into a name -> descriptor map. Exact names overwrite
    /// earlier rows; the `(NPC)`-less alias is only stored if still free.
    pub fn resolve_rows<'r>(&self, rows: impl IntoIterator<Item = OutfitterRow<'r>>) -> Resolution {
        let mut resolution = Resolution::default();
        for row in rows {
            let Some((descriptor, source)) = self.resolve_row(&row) else {
                debug!(name = row.name, "row has no outfiter link; skipping");
                resolution.skipped_rows += 1;
                continue;
            };
            debug!(
                name = row.name,
                look_type = ?descriptor.look_type,
                source = source.as_str(),
                "resolved outfit"
            );

            let descriptor = Rc::new(descriptor);
            resolution.map.insert_exact(row.name, Rc::clone(&descriptor));
            let alias = alias_without_npc_qualifier(row.name);
            if !alias.is_empty() && alias != row.name {
                resolution.map.insert_alias(alias, Rc::clone(&descriptor));
            }
            resolution.records.push(ResolutionRecord {
                name: row.name.to_string(),
                descriptor,
                source,
            });
        }
        resolution
    }
}

/// Steps that only use the template block: type, addons and sex fallbacks.
fn apply_template_fallbacks(descriptor: &mut AppearanceDescriptor, params: &TemplateParams) {
    if descriptor.look_type.is_none() {
        descriptor.look_type = params.int("outfit");
    }

    if params.is_flag_set("addon1") {
        descriptor.add_addons(ADDON_FIRST);
    }
    if params.is_flag_set("addon2") {
        descriptor.add_addons(ADDON_SECOND);
    }

    if descriptor.gender.is_none() {
        descriptor.gender = if params.is_flag_set("female") {
            Some(Gender::Female)
        } else {
            params.get("sex").and_then(Gender::from_flag)
        };
    }
}
