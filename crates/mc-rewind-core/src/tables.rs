//! Static id tables, loaded once before any packet is processed.
//!
//! The on-disk form is JSON with string keys (JSON objects cannot have
//! integer keys):
//!
//! ```json
//! {
//!   "block_states": { "1": 1 },
//!   "items": { "1": 1 },
//!   "particles": { "14": 11 },
//!   "sounds": { "101": 98 },
//!   "enchantments": { "minecraft:multishot": "Multishot" }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::RewriteError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTables {
    block_states: HashMap<String, i32>,
    items: HashMap<String, i32>,
    particles: HashMap<String, i32>,
    sounds: HashMap<String, i32>,
    enchantments: HashMap<String, String>,
}

/// Read-only after construction; share behind an `Arc`.
#[derive(Debug, Default, Clone)]
pub struct MappingTables {
    block_states: HashMap<i32, i32>,
    items: HashMap<i32, i32>,
    particles: HashMap<i32, i32>,
    sounds: HashMap<i32, i32>,
    enchantments: HashMap<String, String>,
}

fn parse_keys(
    table: &'static str,
    raw: HashMap<String, i32>,
) -> Result<HashMap<i32, i32>, RewriteError> {
    raw.into_iter()
        .map(|(key, value)| match key.trim().parse::<i32>() {
            Ok(id) => Ok((id, value)),
            Err(_) => Err(RewriteError::TableKey { table, key }),
        })
        .collect()
}

impl MappingTables {
    pub fn from_json(json: &str) -> Result<Self, RewriteError> {
        let raw: RawTables = serde_json::from_str(json)?;
        Ok(Self {
            block_states: parse_keys("block_states", raw.block_states)?,
            items: parse_keys("items", raw.items)?,
            particles: parse_keys("particles", raw.particles)?,
            sounds: parse_keys("sounds", raw.sounds)?,
            enchantments: raw.enchantments,
        })
    }

    pub fn load(path: &Path) -> Result<Self, RewriteError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn lookup_block_state(&self, id: i32) -> Option<i32> {
        self.block_states.get(&id).copied()
    }

    pub fn lookup_item(&self, id: i32) -> Option<i32> {
        self.items.get(&id).copied()
    }

    pub fn lookup_particle(&self, id: i32) -> Option<i32> {
        self.particles.get(&id).copied()
    }

    pub fn lookup_sound(&self, id: i32) -> Option<i32> {
        self.sounds.get(&id).copied()
    }

    /// Display name for an enchantment the older schema does not know.
    pub fn lookup_enchantment(&self, id: &str) -> Option<&str> {
        self.enchantments.get(id).map(String::as_str)
    }

    pub fn enchantment_count(&self) -> usize {
        self.enchantments.len()
    }

    /// Entry counts for logging: block states, items, particles, sounds.
    pub fn sizes(&self) -> [usize; 4] {
        [
            self.block_states.len(),
            self.items.len(),
            self.particles.len(),
            self.sounds.len(),
        ]
    }
}

/// Collapse a 1.14 villager profession onto the six 1.13.2 professions.
///
/// 1.13.2: 0 farmer, 1 librarian, 2 priest, 3 blacksmith, 4 butcher,
/// 5 nitwit. Codes outside 0..=14 land on nitwit.
pub fn villager_profession(profession: i32) -> i32 {
    match profession {
        // armorer, mason, toolsmith, weaponsmith
        1 | 10 | 13 | 14 => 3,
        // butcher, leatherworker
        2 | 8 => 4,
        // cartographer, librarian
        3 | 9 => 1,
        // cleric
        4 => 2,
        // farmer, fisherman, fletcher, shepherd
        5 | 6 | 7 | 12 => 0,
        // none, nitwit
        _ => 5,
    }
}
