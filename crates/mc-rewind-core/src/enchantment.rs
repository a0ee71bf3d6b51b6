//! Enchantments the older client cannot display.
//!
//! Matching entries are moved out of `Enchantments` / `StoredEnchantments`
//! into a namespaced list and shown as lore lines instead. When that leaves
//! an item with no enchantment at all, a hidden dummy keeps the glint.

use mc_rewind_nbt::{NbtCompound, NbtTag};

use crate::tables::MappingTables;

/// Prefix for every tag this rewriter adds to an item.
pub const DEFAULT_NAMESPACE: &str = "Rewind|1_13_2";

#[derive(Debug, Clone)]
pub struct EnchantmentRewriter {
    namespace: String,
}

impl Default for EnchantmentRewriter {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl EnchantmentRewriter {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Rewrite both enchantment lists of an item tag. Returns true when
    /// anything was moved.
    pub fn rewrite(&self, tag: &mut NbtCompound, tables: &MappingTables) -> bool {
        let mut changed = false;
        if matches!(tag.get("Enchantments"), Some(NbtTag::List(_))) {
            changed |= self.rewrite_list(tag, tables, false);
        }
        if matches!(tag.get("StoredEnchantments"), Some(NbtTag::List(_))) {
            changed |= self.rewrite_list(tag, tables, true);
        }
        changed
    }

    fn rewrite_list(&self, tag: &mut NbtCompound, tables: &MappingTables, stored: bool) -> bool {
        let key = if stored {
            "StoredEnchantments"
        } else {
            "Enchantments"
        };
        let Some(NbtTag::List(entries)) = tag.get_mut(key) else {
            return false;
        };

        let mut moved = Vec::new();
        let mut lore = Vec::new();
        entries.retain(|entry| {
            let Some(compound) = entry.as_compound() else {
                return true;
            };
            let Some(name) = compound
                .get("id")
                .and_then(NbtTag::as_string)
                .and_then(|id| tables.lookup_enchantment(id))
            else {
                return true;
            };
            let level = compound
                .get("lvl")
                .and_then(NbtTag::as_i16_lossy)
                .unwrap_or(1);
            lore.push(NbtTag::String(format!("{name} {}", roman(level))));
            moved.push(entry.clone());
            false
        });
        if lore.is_empty() {
            return false;
        }
        let now_empty = entries.is_empty();

        if !stored && now_empty {
            let mut dummy = NbtCompound::new();
            dummy.insert("id".into(), NbtTag::String(String::new()));
            dummy.insert("lvl".into(), NbtTag::Short(0));
            if let Some(NbtTag::List(entries)) = tag.get_mut(key) {
                entries.push(NbtTag::Compound(dummy));
            }
            tag.insert(format!("{}|dummyEnchant", self.namespace), NbtTag::Byte(0));

            let old_flags = tag.get("HideFlags").and_then(NbtTag::as_i32_lossy);
            if let Some(flags) = old_flags {
                tag.insert(
                    format!("{}|oldHideFlags", self.namespace),
                    NbtTag::Int(flags),
                );
            }
            tag.insert("HideFlags".into(), NbtTag::Int(old_flags.unwrap_or(0) | 1));
        }

        tag.insert(format!("{}|{key}", self.namespace), NbtTag::List(moved));

        let display = tag
            .entry("display".into())
            .or_insert_with(|| NbtTag::Compound(NbtCompound::new()));
        if let Some(display) = display.as_compound_mut() {
            let existing = match display.remove("Lore") {
                Some(NbtTag::List(lines)) => lines,
                _ => Vec::new(),
            };
            lore.extend(existing);
            display.insert("Lore".into(), NbtTag::List(lore));
        }
        true
    }
}

/// Level as shown on a vanilla tooltip.
fn roman(level: i16) -> String {
    let numeral = match level {
        1 => "I",
        2 => "II",
        3 => "III",
        4 => "IV",
        5 => "V",
        6 => "VI",
        7 => "VII",
        8 => "VIII",
        9 => "IX",
        10 => "X",
        _ => return level.to_string(),
    };
    numeral.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> MappingTables {
        MappingTables::from_json(
            r#"{ "enchantments": {
                "minecraft:multishot": "§7Multishot",
                "minecraft:piercing": "§7Piercing"
            } }"#,
        )
        .unwrap()
    }

    fn enchantment(id: &str, lvl: i16) -> NbtTag {
        let mut c = NbtCompound::new();
        c.insert("id".into(), NbtTag::String(id.into()));
        c.insert("lvl".into(), NbtTag::Short(lvl));
        NbtTag::Compound(c)
    }

    fn lore(tag: &NbtCompound) -> Vec<String> {
        tag["display"].as_compound().unwrap()["Lore"]
            .as_list()
            .unwrap()
            .iter()
            .map(|l| l.as_string().unwrap().to_string())
            .collect()
    }

    #[test]
    fn unknown_enchantment_becomes_lore_and_dummy() {
        let mut tag = NbtCompound::new();
        tag.insert(
            "Enchantments".into(),
            NbtTag::List(vec![enchantment("minecraft:multishot", 1)]),
        );
        tag.insert("HideFlags".into(), NbtTag::Int(4));

        assert!(EnchantmentRewriter::default().rewrite(&mut tag, &tables()));

        let remaining = tag["Enchantments"].as_list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].as_compound().unwrap()["id"].as_string(), Some(""));
        assert_eq!(tag["HideFlags"].as_int(), Some(5));
        assert_eq!(tag["Rewind|1_13_2|oldHideFlags"].as_int(), Some(4));
        assert!(tag.contains_key("Rewind|1_13_2|dummyEnchant"));
        assert_eq!(tag["Rewind|1_13_2|Enchantments"].as_list().unwrap().len(), 1);
        assert_eq!(lore(&tag), vec!["§7Multishot I"]);
    }

    #[test]
    fn known_enchantments_stay_and_no_dummy() {
        let mut tag = NbtCompound::new();
        tag.insert(
            "Enchantments".into(),
            NbtTag::List(vec![
                enchantment("minecraft:sharpness", 2),
                enchantment("minecraft:piercing", 4),
            ]),
        );
        EnchantmentRewriter::new("Test").rewrite(&mut tag, &tables());
        let remaining = tag["Enchantments"].as_list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(!tag.contains_key("HideFlags"));
        assert!(!tag.contains_key("Test|dummyEnchant"));
        assert_eq!(lore(&tag), vec!["§7Piercing IV"]);
    }

    #[test]
    fn stored_enchantments_never_get_a_dummy() {
        let mut tag = NbtCompound::new();
        tag.insert(
            "StoredEnchantments".into(),
            NbtTag::List(vec![enchantment("minecraft:piercing", 3)]),
        );
        let mut display = NbtCompound::new();
        display.insert("Lore".into(), NbtTag::List(vec![NbtTag::String("old".into())]));
        tag.insert("display".into(), NbtTag::Compound(display));

        EnchantmentRewriter::default().rewrite(&mut tag, &tables());
        assert!(tag["StoredEnchantments"].as_list().unwrap().is_empty());
        assert!(!tag.contains_key("HideFlags"));
        assert!(tag.contains_key("Rewind|1_13_2|StoredEnchantments"));
        assert_eq!(lore(&tag), vec!["§7Piercing III", "old"]);
    }

    #[test]
    fn nothing_to_move() {
        let mut tag = NbtCompound::new();
        tag.insert(
            "Enchantments".into(),
            NbtTag::List(vec![enchantment("minecraft:unbreaking", 3)]),
        );
        let before = tag.clone();
        assert!(!EnchantmentRewriter::default().rewrite(&mut tag, &tables()));
        assert_eq!(tag, before);
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(roman(4), "IV");
        assert_eq!(roman(10), "X");
        assert_eq!(roman(11), "11");
    }
}
