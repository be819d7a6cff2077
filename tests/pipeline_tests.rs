use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use outfitter::config::Settings;
use outfitter::outfit::{generate_outfits, load_appearance_json, resolve_outfits, Gender};
use outfitter::wiki::{PageSource, WikiError, WikiPage};
use outfitter::Error;
use pretty_assertions::assert_eq;
use rusqlite::Connection;

const OUTFITTER_PAGE: &str = "\
{| class=\"wikitable\"
! Name !! Outfit !! Template
|-
| Akananto (NPC) || https://tibia.fandom.com/Outfiter?o=128&c1=19&c2=86&a1=1 || {{Outfitter|outfit=128}}
|-
| Akananto || https://tibia.fandom.com/Outfiter?o=136&f=fm || {{Outfitter|female}}
|-
| Benjamin || /wiki/Outfiter?c1=3 || {{Outfitter|outfit=266|addon2=yes}}
|-
| Carla || https://tibia.fandom.com/Outfiter?o=137 || {{Outfitter}}
|-
| Nobody || || {{Outfitter|outfit=1}}
|-
| Old Timer || https://tibia.fandom.com/Outfiter?o=1 || {{Outfitter|sex=m}}
|}";

const REFERENCE_XML: &str = r#"<?xml version="1.0"?>
<outfits>
    <outfit type="0" looktype="136" name="Citizen" />
    <outfit type="0" looktype="137" name="Hunter" />
    <outfit type="1" looktype="128" name="Citizen" />
    <outfit type="1" looktype="129" name="Hunter" />
</outfits>
"#;

struct FakeWiki {
    pages: HashMap<String, String>,
    fail: bool,
    requests: Cell<usize>,
}

impl FakeWiki {
    fn new() -> Self {
        let pages = [
            ("NPC Outfitter Codes", OUTFITTER_PAGE),
            ("Citizen Outfits", "{{Infobox Outfit|male_id = 128|female_id = 136}}"),
        ]
        .into_iter()
        .map(|(title, content)| (title.to_string(), content.to_string()))
        .collect();
        Self {
            pages,
            fail: false,
            requests: Cell::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

impl PageSource for FakeWiki {
    fn fetch_pages(&self, titles: &[&str]) -> Result<Vec<WikiPage>, WikiError> {
        self.requests.set(self.requests.get() + 1);
        if self.fail {
            return Err(WikiError::Status {
                titles: titles.join("|"),
                status: 503,
            });
        }
        Ok(titles
            .iter()
            .filter_map(|title| {
                self.pages.get(*title).map(|content| WikiPage {
                    title: title.to_string(),
                    content: content.clone(),
                })
            })
            .collect())
    }
}

fn write_dataset(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE outfit (article_id INTEGER PRIMARY KEY, title TEXT NOT NULL, name TEXT);
         CREATE TABLE npc (article_id INTEGER PRIMARY KEY, title TEXT NOT NULL, name TEXT,
                           city TEXT, x INTEGER, y INTEGER, z INTEGER);
         CREATE TABLE item (article_id INTEGER PRIMARY KEY, title TEXT NOT NULL, name TEXT,
                            actual_name TEXT, client_id INTEGER);
         CREATE TABLE npc_offer_sell (npc_id INTEGER, item_id INTEGER, value INTEGER);
         CREATE TABLE npc_offer_buy (npc_id INTEGER, item_id INTEGER, value INTEGER);
         INSERT INTO outfit VALUES (7, 'Citizen Outfits', 'Citizen');",
    )
    .unwrap();
}

fn settings(dir: &Path) -> Settings {
    let dataset_path = dir.join("tibiawiki.db");
    write_dataset(&dataset_path);
    let outfits_xml_path = dir.join("outfits.xml");
    fs::write(&outfits_xml_path, REFERENCE_XML).unwrap();
    Settings {
        dataset_path,
        outfits_xml_path,
        outfits_json_path: dir.join("out").join("outfits.json"),
        output_dir: dir.join("npcs"),
        ..Settings::default()
    }
}

#[test]
fn full_run_resolves_every_source_tier() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path());
    let wiki = FakeWiki::new();

    let summary = generate_outfits(&wiki, &settings, None).unwrap();
    assert_eq!(summary.rows_resolved, 5);
    assert_eq!(summary.rows_skipped, 1);
    // Akananto (NPC), Akananto, Benjamin, Carla, Old Timer
    assert_eq!(summary.entries_written, 5);

    let map = load_appearance_json(&settings.outfits_json_path).unwrap();

    let qualified = &map["Akananto (NPC)"];
    assert_eq!(qualified.look_type, Some(128));
    assert_eq!(qualified.outfit_id, Some(7));
    assert_eq!(qualified.outfit_name.as_deref(), Some("Citizen"));
    assert_eq!(qualified.gender, Some(Gender::Male));
    assert_eq!(qualified.addons, 1);

    // The exact row wins over the alias derived from "Akananto (NPC)".
    let exact = &map["Akananto"];
    assert_eq!(exact.look_type, Some(136));
    assert_eq!(exact.gender, Some(Gender::Female));

    let benjamin = &map["Benjamin"];
    assert_eq!(benjamin.look_type, Some(266));
    assert_eq!(benjamin.outfit_id, Some(266));
    assert_eq!(benjamin.head, Some(3));
    assert_eq!(benjamin.addons, 2);

    let carla = &map["Carla"];
    assert_eq!(carla.outfit_id, Some(137));
    assert_eq!(carla.outfit_name.as_deref(), Some("Hunter"));
    assert_eq!(carla.gender, Some(Gender::Female));

    let old_timer = &map["Old Timer"];
    assert_eq!(old_timer.look_type, Some(129));
    assert_eq!(old_timer.outfit_name.as_deref(), Some("Hunter"));
    assert_eq!(old_timer.gender, Some(Gender::Male));

    assert!(!map.contains_key("Nobody"));
}

#[test]
fn rerun_produces_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path());

    generate_outfits(&FakeWiki::new(), &settings, None).unwrap();
    let first = fs::read(&settings.outfits_json_path).unwrap();
    generate_outfits(&FakeWiki::new(), &settings, None).unwrap();
    let second = fs::read(&settings.outfits_json_path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn report_lists_rows_in_scrape_order() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path());
    let report_path = dir.path().join("report.csv");

    generate_outfits(&FakeWiki::new(), &settings, Some(&report_path)).unwrap();
    let report = fs::read_to_string(&report_path).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "name,look_type,outfit_id,outfit_name,sex,addons,source");
    assert_eq!(lines.len(), 6);
    assert!(lines[1].starts_with("Akananto (NPC),128,7,Citizen,male,1,"));
    assert!(lines[5].starts_with("Old Timer,129,"));
}

#[test]
fn missing_local_sources_still_resolve_raw_values() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        dataset_path: dir.path().join("absent.db"),
        outfits_xml_path: dir.path().join("absent.xml"),
        outfits_json_path: dir.path().join("outfits.json"),
        ..Settings::default()
    };

    let resolution = resolve_outfits(&FakeWiki::new(), &settings).unwrap();
    let carla = resolution.map.get("Carla").unwrap();
    assert_eq!(carla.look_type, Some(137));
    assert_eq!(carla.outfit_id, Some(137));
    assert_eq!(carla.outfit_name, None);
}

#[test]
fn transport_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path());
    let wiki = FakeWiki::failing();

    let err = generate_outfits(&wiki, &settings, None).unwrap_err();
    assert!(matches!(err, Error::Wiki(WikiError::Status { status: 503, .. })));
    assert_eq!(wiki.requests.get(), 1);
    assert!(!settings.outfits_json_path.exists());
}

#[test]
fn failed_report_leaves_existing_appearance_map_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path());
    fs::create_dir_all(settings.outfits_json_path.parent().unwrap()).unwrap();
    fs::write(&settings.outfits_json_path, "{}").unwrap();
    // A directory cannot be written as a file.
    let report_path = dir.path().join("reports");
    fs::create_dir_all(&report_path).unwrap();

    let err = generate_outfits(&FakeWiki::new(), &settings, Some(&report_path)).unwrap_err();
    assert!(matches!(err, Error::Report { .. }));
    assert_eq!(fs::read_to_string(&settings.outfits_json_path).unwrap(), "{}");
}

#[test]
fn scheme_less_outfiter_links_resolve() {
    const PAGE: &str = "| Zora || tibia.fandom.com/Outfiter?o=137&c1=5 || {{Outfitter}}";
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path());
    let mut wiki = FakeWiki::new();
    wiki.pages
        .insert("NPC Outfitter Codes".to_string(), PAGE.to_string());

    let resolution = resolve_outfits(&wiki, &settings).unwrap();
    let zora = resolution.map.get("Zora").unwrap();
    assert_eq!(zora.look_type, Some(137));
    assert_eq!(zora.head, Some(5));
    assert_eq!(zora.outfit_name.as_deref(), Some("Hunter"));
}
