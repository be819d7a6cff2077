//! Appearance descriptor: the resolved look of one NPC as written to `outfits.json`.
//! Field names on the wire match what the NPC asset generator reads back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Addon bit for the first addon (`a1` / `addon1`).
pub const ADDON_FIRST: u8 = 1;
/// Addon bit for the second addon (`a2` / `addon2`).
pub const ADDON_SECOND: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Normalize a loose wiki/outfiter sex flag: `f...` is female, `m...` is male,
    /// anything else (including empty) is unknown.
    pub fn from_flag(flag: &str) -> Option<Self> {
        let flag = flag.trim().to_lowercase();
        if flag.starts_with('f') {
            Some(Self::Female)
        } else if flag.starts_with('m') {
            Some(Self::Male)
        } else {
            None
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `true`, `yes`, `1` or `y`, case-insensitive and ignoring surrounding whitespace.
pub fn is_truthy_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "y"
    )
}

/// Resolved (or partially resolved) appearance of one NPC.
///
/// Every field except `addons` is optional and omitted from JSON when unknown;
/// `addons` is always written, `0` when no addon was seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceDescriptor {
    /// Client lookType shown to the player.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub look_type: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feet: Option<u32>,
    /// Addon ownership mask, bit 0 = first addon, bit 1 = second addon.
    #[serde(default)]
    pub addons: u8,
    #[serde(rename = "sex", default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Stable catalogue id of the outfit. Not necessarily equal to `look_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfit_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfit_name: Option<String>,
}

impl AppearanceDescriptor {
    /// Set addon bits. Bits are only ever added, never cleared.
    pub fn add_addons(&mut self, bits: u8) {
        self.addons |= bits & (ADDON_FIRST | ADDON_SECOND);
    }

    /// Fill gender only when it is still unknown.
    pub fn set_gender_if_unknown(&mut self, gender: Option<Gender>) {
        if self.gender.is_none() {
            self.gender = gender;
        }
    }
}
