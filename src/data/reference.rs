//! Reference outfit catalogue (`outfits.xml`), the offline fallback source:
//!   `<outfits><outfit type="0" looktype="136" name="Citizen" .../></outfits>`
//!
//! `type="0"` marks a female outfit, anything else is male. File order matters:
//! the position of an outfit within its sex block is used by the ordinal fallback.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::{info, warn};

use crate::outfit::Gender;

pub const DEFAULT_OUTFITS_XML_PATH: &str = "outfits.xml";
const OUTFIT_ELEMENT: &[u8] = b"outfit";
const FEMALE_TYPE: &str = "0";

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to read reference catalogue: {0}")]
    Read(#[from] std::io::Error),
    #[error("malformed reference catalogue XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCatalogueEntry {
    pub look_type: u32,
    pub name: String,
    pub sex: Gender,
}

/// Direct lookType index plus the per-sex outfit lists in file order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalogue {
    by_look_type: HashMap<u32, ReferenceCatalogueEntry>,
    female: Vec<ReferenceCatalogueEntry>,
    male: Vec<ReferenceCatalogueEntry>,
}

impl ReferenceCatalogue {
    /// Build from entries in file order; the last entry wins on a lookType collision.
    pub fn from_entries(entries: impl IntoIterator<Item = ReferenceCatalogueEntry>) -> Self {
        let mut catalogue = Self::default();
        for entry in entries {
            match entry.sex {
                Gender::Female => catalogue.female.push(entry.clone()),
                Gender::Male => catalogue.male.push(entry.clone()),
            }
            catalogue.by_look_type.insert(entry.look_type, entry);
        }
        catalogue
    }

    pub fn get(&self, look_type: u32) -> Option<&ReferenceCatalogueEntry> {
        self.by_look_type.get(&look_type)
    }

    /// Outfits of one sex in file order.
    pub fn ordered(&self, sex: Gender) -> &[ReferenceCatalogueEntry] {
        match sex {
            Gender::Female => &self.female,
            Gender::Male => &self.male,
        }
    }

    /// Zero-based position within the sex block.
    pub fn nth(&self, sex: Gender, position: usize) -> Option<&ReferenceCatalogueEntry> {
        self.ordered(sex).get(position)
    }

    pub fn len(&self) -> usize {
        self.female.len() + self.male.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_outfit_element(
    element: &BytesStart<'_>,
) -> Result<Option<ReferenceCatalogueEntry>, quick_xml::Error> {
    let mut look_type = None;
    let mut name = None;
    let mut sex_type = None;
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"looktype" => look_type = Some(value),
            b"name" => name = Some(value),
            b"type" => sex_type = Some(value),
            _ => {}
        }
    }

    let (Some(look_type), Some(name), Some(sex_type)) = (look_type, name, sex_type) else {
        return Ok(None);
    };
    if name.is_empty() {
        return Ok(None);
    }
    let Ok(look_type) = look_type.trim().parse::<u32>() else {
        return Ok(None);
    };
    let sex = if sex_type == FEMALE_TYPE {
        Gender::Female
    } else {
        Gender::Male
    };
    Ok(Some(ReferenceCatalogueEntry {
        look_type,
        name: name.trim().to_string(),
        sex,
    }))
}

/// Parse catalogue XML. Only `outfit` elements directly under the root element count;
/// incomplete or non-numeric entries are skipped.
pub fn parse_reference_catalogue(xml: &str) -> Result<ReferenceCatalogue, CatalogueError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut entries = Vec::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                if depth == 1 && element.name().as_ref() == OUTFIT_ELEMENT {
                    entries.extend(parse_outfit_element(&element)?);
                }
                depth += 1;
            }
            Event::Empty(element) => {
                if depth == 1 && element.name().as_ref() == OUTFIT_ELEMENT {
                    entries.extend(parse_outfit_element(&element)?);
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ReferenceCatalogue::from_entries(entries))
}

/// Load the catalogue from disk. A missing file is an empty catalogue, not an error.
pub fn load_reference_catalogue(
    path: impl AsRef<Path>,
) -> Result<ReferenceCatalogue, CatalogueError> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "reference catalogue not found; continuing without it");
        return Ok(ReferenceCatalogue::default());
    }
    let raw = fs::read_to_string(path)?;
    let catalogue = parse_reference_catalogue(&raw)?;
    info!(
        path = %path.display(),
        female = catalogue.ordered(Gender::Female).len(),
        male = catalogue.ordered(Gender::Male).len(),
        "loaded reference catalogue"
    );
    Ok(catalogue)
}
