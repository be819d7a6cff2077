//! Text of the three files generated per NPC: `<npc>.xml`, `shops/<npc>.shop`
//! and `scripts/<npc>.lua`.

use super::look::NpcLook;
use super::slug::xml_escape_attr;

/// Spawn position; missing coordinates default to `(0, 0, 7)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomePosition {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl HomePosition {
    pub fn from_optional(x: Option<i64>, y: Option<i64>, z: Option<i64>) -> Self {
        Self {
            x: x.unwrap_or(0),
            y: y.unwrap_or(0),
            z: z.unwrap_or(7),
        }
    }
}

/// One tradeable item: lower-cased name, client id and price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopEntry {
    pub name: String,
    pub client_id: i64,
    pub price: i64,
}

pub fn script_file(file_base: &str) -> String {
    format!("scripts/{file_base}.lua")
}

pub fn shop_file(file_base: &str) -> String {
    format!("shops/{file_base}.shop")
}

pub fn render_npc_xml(
    npc_name: &str,
    file_base: &str,
    look: &NpcLook,
    home: HomePosition,
    has_shop: bool,
) -> String {
    let mut lines = vec![
        r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string(),
        format!(
            r#"<npc name="{}" script="{}" walkinterval="2000" floorchange="0">"#,
            xml_escape_attr(npc_name),
            xml_escape_attr(&script_file(file_base))
        ),
        "\t<health now=\"100\" max=\"100\" />".to_string(),
        format!(
            "\t<look type=\"{}\" head=\"{}\" body=\"{}\" legs=\"{}\" feet=\"{}\" addons=\"{}\" />",
            look.look_type, look.head, look.body, look.legs, look.feet, look.addons
        ),
        format!("\t<home x=\"{}\" y=\"{}\" z=\"{}\"/>", home.x, home.y, home.z),
    ];

    if has_shop {
        lines.push("\t<parameters>".to_string());
        lines.push("\t\t<parameter key=\"module_shop\" value=\"1\" />".to_string());
        lines.push(format!(
            "\t\t<parameter key=\"shop_file\" value=\"{}\" />",
            xml_escape_attr(&shop_file(file_base))
        ));
        lines.push("\t</parameters>".to_string());
    }

    lines.push("</npc>".to_string());
    lines.join("\n")
}

/// `"\n\t\t\tname,client_id,price;\n..."`, or empty when there are no entries.
pub fn build_shop_value(entries: &[ShopEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            format!(
                "\t\t\t{},{},{};",
                xml_escape_attr(&entry.name),
                entry.client_id,
                entry.price
            )
        })
        .collect();
    format!("\n{}", lines.join("\n"))
}

/// `buyable` are items the player buys from the NPC, `sellable` items the NPC buys.
pub fn render_shop_xml(buyable: &[ShopEntry], sellable: &[ShopEntry]) -> String {
    let mut lines = vec![
        r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string(),
        "<shop>".to_string(),
        "\t<parameters>".to_string(),
    ];
    for (key, entries) in [("shop_buyable", buyable), ("shop_sellable", sellable)] {
        if entries.is_empty() {
            continue;
        }
        lines.push(format!(
            "\t\t<parameter key=\"{key}\" value=\"{}\" />",
            build_shop_value(entries).replace('"', "&quot;")
        ));
    }
    lines.push("\t</parameters>".to_string());
    lines.push("</shop>".to_string());
    lines.join("\n")
}

/// Plain NpcSystem boilerplate with a focus module and an empty default callback.
pub fn render_lua_script(npc_name: &str) -> String {
    format!(
        r#"local keywordHandler = KeywordHandler:new()
local npcHandler = NpcHandler:new(keywordHandler)
NpcSystem.parseParameters(npcHandler)

function onCreatureAppear(cid) npcHandler:onCreatureAppear(cid) end
function onCreatureDisappear(cid) npcHandler:onCreatureDisappear(cid) end
function onCreatureSay(cid, type, msg) npcHandler:onCreatureSay(cid, type, msg) end
function onThink() npcHandler:onThink() end

local function creatureSayCallback(cid, type, msg)
    if not npcHandler:isFocused(cid) then
        return false
    end
    -- Add custom conversation logic for {npc_name} here if you want.
    return true
end

npcHandler:setCallback(CALLBACK_MESSAGE_DEFAULT, creatureSayCallback)
npcHandler:addModule(FocusModule:new())
"#
    )
}
