//! Newer → older entity kind resolution.

use std::collections::HashMap;

use super::kind::EntityKind;
use super::legacy::LegacyKind;

/// What a newer kind is presented as on the older client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    pub legacy: LegacyKind,
    /// Name shown above the stand-in entity.
    pub display_name: Option<&'static str>,
}

/// Kind table. Kinds without an explicit override map to the legacy kind
/// of the same registry name.
#[derive(Debug, Clone, Default)]
pub struct EntityMappings {
    overrides: HashMap<EntityKind, (EntityKind, Option<&'static str>)>,
}

impl EntityMappings {
    /// Overrides for the kinds 1.14 added.
    pub fn for_1_14() -> Self {
        let mut mappings = Self::default();
        mappings.map_entity(EntityKind::Cat, EntityKind::Ocelot, "Cat");
        mappings.map_entity(EntityKind::TraderLlama, EntityKind::Llama, "Trader Llama");
        mappings.map_entity(EntityKind::Fox, EntityKind::Wolf, "Fox");
        mappings.map_entity(EntityKind::Panda, EntityKind::PolarBear, "Panda");
        mappings.map_entity(EntityKind::Pillager, EntityKind::Villager, "Pillager");
        mappings.map_entity(
            EntityKind::WanderingTrader,
            EntityKind::Villager,
            "Wandering Trader",
        );
        mappings.map_entity(EntityKind::Ravager, EntityKind::Cow, "Ravager");
        mappings
    }

    /// Present `from` as `to`, labelled with `display_name`.
    pub fn map_entity(&mut self, from: EntityKind, to: EntityKind, display_name: &'static str) {
        self.overrides.insert(from, (to, Some(display_name)));
    }

    pub fn resolve(&self, kind: EntityKind) -> Option<Replacement> {
        let (target, display_name) = self.overrides.get(&kind).copied().unwrap_or((kind, None));
        if target.is_abstract() {
            return None;
        }
        LegacyKind::from_name(target.name()).map(|legacy| Replacement {
            legacy,
            display_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_spawnable_kind_resolves() {
        let mappings = EntityMappings::for_1_14();
        for kind in EntityKind::concrete_kinds() {
            assert!(mappings.resolve(kind).is_some(), "{kind} has no stand-in");
        }
    }

    #[test]
    fn overrides_carry_names() {
        let mappings = EntityMappings::for_1_14();
        assert_eq!(
            mappings.resolve(EntityKind::Fox),
            Some(Replacement {
                legacy: LegacyKind::Wolf,
                display_name: Some("Fox"),
            })
        );
        assert_eq!(
            mappings.resolve(EntityKind::WanderingTrader).map(|r| r.legacy),
            Some(LegacyKind::Villager)
        );
    }

    #[test]
    fn same_name_kinds_have_no_label() {
        let mappings = EntityMappings::for_1_14();
        let zombie = mappings.resolve(EntityKind::Zombie).unwrap();
        assert_eq!(zombie.legacy, LegacyKind::Zombie);
        assert_eq!(zombie.display_name, None);
    }

    #[test]
    fn empty_table_drops_new_kinds() {
        let mappings = EntityMappings::default();
        assert_eq!(mappings.resolve(EntityKind::Panda), None);
        assert_eq!(mappings.resolve(EntityKind::AbstractMonster), None);
    }
}
