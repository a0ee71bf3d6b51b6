//! Block state, particle and item rewriting for the older client.

use std::sync::Arc;

use mc_rewind_proto::{Item, Particle, ParticleData, Schema};

use crate::diagnostics::DiagnosticsSink;
use crate::enchantment::EnchantmentRewriter;
use crate::tables::MappingTables;

/// Block state used when a 1.14 state has no 1.13.2 equivalent (air).
pub const FALLBACK_BLOCK_STATE: i32 = 0;
/// Item used when a 1.14 item has no 1.13.2 equivalent (stone).
///
/// Id 0 is air, which a 1.13.2 client draws as an empty slot while the stack
/// still counts server side, so an unknown item shows as stone instead.
pub const FALLBACK_ITEM: i32 = 1;

pub trait BlockItemRemapper: Send + Sync {
    fn remap_block_state(&self, state: i32) -> i32;

    /// Remap a particle decoded with 1.14 ids, including its data.
    fn remap_particle(&self, particle: Particle) -> Particle;

    fn rewrite_item(&self, item: Option<Item>) -> Option<Item>;
}

/// [`BlockItemRemapper`] backed by [`MappingTables`].
pub struct TableRemapper {
    tables: Arc<MappingTables>,
    enchantments: EnchantmentRewriter,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl TableRemapper {
    pub fn new(
        tables: Arc<MappingTables>,
        enchantments: EnchantmentRewriter,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            tables,
            enchantments,
            diagnostics,
        }
    }

    /// Structural particle ids are known even without a table entry.
    fn builtin_particle(id: i32) -> Option<i32> {
        let newer = Schema::V1_14.particle_ids();
        let older = Schema::V1_13_2.particle_ids();
        [
            (newer.block, older.block),
            (newer.dust, older.dust),
            (newer.falling_dust, older.falling_dust),
            (newer.item, older.item),
        ]
        .into_iter()
        .find(|(from, _)| *from == id)
        .map(|(_, to)| to)
    }
}

impl BlockItemRemapper for TableRemapper {
    fn remap_block_state(&self, state: i32) -> i32 {
        self.tables.lookup_block_state(state).unwrap_or_else(|| {
            self.diagnostics
                .warn(&format!("missing 1.13.2 block state for {state}"));
            FALLBACK_BLOCK_STATE
        })
    }

    fn remap_particle(&self, particle: Particle) -> Particle {
        let id = self
            .tables
            .lookup_particle(particle.id)
            .or_else(|| Self::builtin_particle(particle.id))
            .unwrap_or_else(|| {
                self.diagnostics
                    .warn(&format!("missing 1.13.2 particle for {}", particle.id));
                particle.id
            });
        let data = match particle.data {
            ParticleData::BlockState(state) => ParticleData::BlockState(self.remap_block_state(state)),
            ParticleData::Item(item) => ParticleData::Item(self.rewrite_item(item)),
            other => other,
        };
        Particle { id, data }
    }

    fn rewrite_item(&self, item: Option<Item>) -> Option<Item> {
        let mut item = item?;
        let id = item.id;
        item.id = self.tables.lookup_item(id).unwrap_or_else(|| {
            self.diagnostics.warn(&format!("missing 1.13.2 item for {id}"));
            FALLBACK_ITEM
        });
        if let Some(tag) = item.tag.as_mut() {
            self.enchantments.rewrite(&mut tag.compound, &self.tables);
        }
        Some(item)
    }
}
