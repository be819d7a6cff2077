//! Canonical lookType index: outfit catalogue rows from the local dataset joined
//! with the `male_id` / `female_id` values of each outfit's infobox on the wiki.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::outfit::Gender;
use crate::wiki::{PageSource, WikiError};

/// Outfit pages requested per API round-trip.
pub const LOOKTYPE_BATCH_SIZE: usize = 20;

// `\b` keeps `male_id` from matching inside `female_id`.
static MALE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bmale_id\s*=\s*([0-9]+)").expect("male_id pattern is valid"));
static FEMALE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"female_id\s*=\s*([0-9]+)").expect("female_id pattern is valid")
});

/// One row of the dataset's outfit catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueOutfit {
    pub catalogue_id: u32,
    pub title: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalLookTypeEntry {
    pub look_type: u32,
    pub catalogue_id: u32,
    pub name: String,
    pub sex: Gender,
}

/// lookType -> catalogue entry. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CanonicalLookTypeIndex {
    entries: HashMap<u32, CanonicalLookTypeEntry>,
}

impl CanonicalLookTypeIndex {
    pub fn get(&self, look_type: u32) -> Option<&CanonicalLookTypeEntry> {
        self.entries.get(&look_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last write wins. Returns the entry that was replaced, if any.
    fn insert(&mut self, entry: CanonicalLookTypeEntry) -> Option<CanonicalLookTypeEntry> {
        self.entries.insert(entry.look_type, entry)
    }
}

impl FromIterator<CanonicalLookTypeEntry> for CanonicalLookTypeIndex {
    fn from_iter<I: IntoIterator<Item = CanonicalLookTypeEntry>>(iter: I) -> Self {
        let mut index = Self::default();
        for entry in iter {
            index.insert(entry);
        }
        index
    }
}

fn capture_id(re: &Regex, content: &str) -> Option<u32> {
    re.captures(content)?.get(1)?.as_str().parse().ok()
}

/// First `male_id = N` and `female_id = N` in an outfit page, each optional.
pub fn extract_looktype_ids(content: &str) -> (Option<u32>, Option<u32>) {
    (
        capture_id(&MALE_ID_RE, content),
        capture_id(&FEMALE_ID_RE, content),
    )
}

/// Fetch outfit pages in batches of [LOOKTYPE_BATCH_SIZE] and index their lookTypes.
///
/// An outfit contributes zero, one or two entries. Any retrieval failure aborts
/// the build. Collisions keep the later entry and are logged.
pub fn build_looktype_index<S: PageSource + ?Sized>(
    source: &S,
    outfits: &[CatalogueOutfit],
) -> Result<CanonicalLookTypeIndex, WikiError> {
    let mut index = CanonicalLookTypeIndex::default();
    let batch_count = outfits.len().div_ceil(LOOKTYPE_BATCH_SIZE);

    for (batch_number, batch) in outfits.chunks(LOOKTYPE_BATCH_SIZE).enumerate() {
        let titles: Vec<&str> = batch.iter().map(|outfit| outfit.title.as_str()).collect();
        let pages = source.fetch_pages(&titles)?;
        let content_by_title: HashMap<String, String> = pages
            .into_iter()
            .map(|page| (page.title, page.content))
            .collect();

        for outfit in batch {
            let Some(content) = content_by_title.get(&outfit.title) else {
                debug!(title = %outfit.title, "outfit page has no content");
                continue;
            };
            let (male, female) = extract_looktype_ids(content);
            for (look_type, sex) in [(male, Gender::Male), (female, Gender::Female)] {
                let Some(look_type) = look_type else {
                    continue;
                };
                let replaced = index.insert(CanonicalLookTypeEntry {
                    look_type,
                    catalogue_id: outfit.catalogue_id,
                    name: outfit.name.clone(),
                    sex,
                });
                if let Some(previous) = replaced {
                    warn!(
                        look_type,
                        previous = %previous.name,
                        current = %outfit.name,
                        "lookType claimed by more than one outfit; keeping the later one"
                    );
                }
            }
        }

        info!(
            batch = batch_number + 1,
            batches = batch_count,
            indexed = index.len(),
            "indexed outfit batch"
        );
    }

    Ok(index)
}
