//! Look attributes of a generated NPC: the appearance map merged over a built-in default.

use std::collections::{BTreeMap, HashMap};

use crate::outfit::AppearanceDescriptor;

/// Fully specified `<look>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NpcLook {
    pub look_type: u32,
    pub head: u32,
    pub body: u32,
    pub legs: u32,
    pub feet: u32,
    pub addons: u8,
}

/// Male mage in the stock palette, used for NPCs the appearance map does not know.
pub const DEFAULT_LOOK: NpcLook = NpcLook {
    look_type: 130,
    head: 19,
    body: 86,
    legs: 87,
    feet: 95,
    addons: 0,
};

impl NpcLook {
    /// Every known field of `descriptor` replaces the default's.
    pub fn from_descriptor(descriptor: &AppearanceDescriptor) -> Self {
        Self {
            look_type: descriptor.look_type.unwrap_or(DEFAULT_LOOK.look_type),
            head: descriptor.head.unwrap_or(DEFAULT_LOOK.head),
            body: descriptor.body.unwrap_or(DEFAULT_LOOK.body),
            legs: descriptor.legs.unwrap_or(DEFAULT_LOOK.legs),
            feet: descriptor.feet.unwrap_or(DEFAULT_LOOK.feet),
            addons: descriptor.addons,
        }
    }
}

impl Default for NpcLook {
    fn default() -> Self {
        DEFAULT_LOOK
    }
}

/// Case-insensitive view of the appearance map. Keys are lower-cased once here.
#[derive(Debug, Clone, Default)]
pub struct AppearanceLookup {
    by_name: HashMap<String, AppearanceDescriptor>,
}

impl AppearanceLookup {
    /// Later keys win when two names only differ in case; the input is ordered,
    /// so the winner is stable.
    pub fn from_map(map: BTreeMap<String, AppearanceDescriptor>) -> Self {
        let by_name = map
            .into_iter()
            .map(|(name, descriptor)| (name.to_lowercase(), descriptor))
            .collect();
        Self { by_name }
    }

    pub fn get(&self, npc_name: &str) -> Option<&AppearanceDescriptor> {
        self.by_name.get(&npc_name.to_lowercase())
    }

    pub fn look_for(&self, npc_name: &str) -> NpcLook {
        self.get(npc_name)
            .map(NpcLook::from_descriptor)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
