//! Name -> appearance mapping produced by the resolver and persisted as `outfits.json`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::descriptor::AppearanceDescriptor;

pub const DEFAULT_OUTFITS_JSON_PATH: &str = "outfits.json";

/// Appearance per NPC display name. Aliases share the descriptor of the name
/// they were derived from through the same `Rc`.
#[derive(Debug, Clone, Default)]
pub struct AppearanceMap {
    entries: HashMap<String, Rc<AppearanceDescriptor>>,
}

impl AppearanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store under the exact display name. Exact names always overwrite.
    pub fn insert_exact(&mut self, name: &str, descriptor: Rc<AppearanceDescriptor>) {
        self.entries.insert(name.to_string(), descriptor);
    }

    /// Store under an alias only if nothing is stored there yet; returns whether it was stored.
    pub fn insert_alias(&mut self, alias: &str, descriptor: Rc<AppearanceDescriptor>) -> bool {
        if self.entries.contains_key(alias) {
            return false;
        }
        self.entries.insert(alias.to_string(), descriptor);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Rc<AppearanceDescriptor>> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by lower-cased name; the exact name breaks ties so the
    /// order is total and the output stable across runs.
    pub fn sorted_entries(&self) -> Vec<(&str, &AppearanceDescriptor)> {
        let mut sorted: Vec<(String, &str, &AppearanceDescriptor)> = self
            .entries
            .iter()
            .map(|(name, descriptor)| (name.to_lowercase(), name.as_str(), descriptor.as_ref()))
            .collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        sorted
            .into_iter()
            .map(|(_, name, descriptor)| (name, descriptor))
            .collect()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for AppearanceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted = self.sorted_entries();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (name, descriptor) in sorted {
            map.serialize_entry(name, descriptor)?;
        }
        map.end()
    }
}

/// Read a previously written `outfits.json`. Keys are kept exactly as written.
pub fn load_appearance_json(
    path: impl AsRef<Path>,
) -> io::Result<BTreeMap<String, AppearanceDescriptor>> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn look(look_type: u32) -> Rc<AppearanceDescriptor> {
        Rc::new(AppearanceDescriptor {
            look_type: Some(look_type),
            ..AppearanceDescriptor::default()
        })
    }

    #[test]
    fn exact_names_overwrite() {
        let mut map = AppearanceMap::new();
        map.insert_exact("Sam", look(1));
        map.insert_exact("Sam", look(2));
        assert_eq!(map.get("Sam").unwrap().look_type, Some(2));
    }

    #[test]
    fn alias_never_overwrites_and_first_alias_wins() {
        let mut map = AppearanceMap::new();
        map.insert_exact("Sam", look(1));
        assert!(!map.insert_alias("Sam", look(9)));
        assert_eq!(map.get("Sam").unwrap().look_type, Some(1));

        assert!(map.insert_alias("Ben", look(2)));
        assert!(!map.insert_alias("Ben", look(3)));
        assert_eq!(map.get("Ben").unwrap().look_type, Some(2));
    }

    #[test]
    fn alias_shares_the_same_descriptor() {
        let mut map = AppearanceMap::new();
        let descriptor = look(7);
        map.insert_exact("Akananto (NPC)", Rc::clone(&descriptor));
        map.insert_alias("Akananto", Rc::clone(&descriptor));
        assert!(Rc::ptr_eq(
            map.get("Akananto").unwrap(),
            map.get("Akananto (NPC)").unwrap()
        ));
    }

    #[test]
    fn serializes_in_case_insensitive_order() {
        let mut map = AppearanceMap::new();
        map.insert_exact("bob", look(2));
        map.insert_exact("Alice", look(1));
        map.insert_exact("Carl", look(3));
        map.insert_exact("Bob", look(4));
        let names: Vec<_> = map.sorted_entries().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Alice", "Bob", "bob", "Carl"]);

        let json = map.to_json_pretty().unwrap();
        assert!(json.starts_with("{\n  \"Alice\": {\n    \"type\": 1,\n    \"addons\": 0\n  },"));
    }

    #[test]
    fn non_ascii_names_are_written_verbatim() {
        let mut map = AppearanceMap::new();
        map.insert_exact("Göran", look(5));
        assert!(map.to_json_pretty().unwrap().contains("\"Göran\""));
    }

    #[test]
    fn written_json_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outfits.json");
        let mut map = AppearanceMap::new();
        map.insert_exact("Sam", look(130));
        fs::write(&path, map.to_json_pretty().unwrap()).unwrap();

        let loaded = load_appearance_json(&path).unwrap();
        assert_eq!(loaded["Sam"].look_type, Some(130));
        assert_eq!(loaded["Sam"].addons, 0);
    }
}
