//! The 1.14 → 1.13.2 metadata chain.
//!
//! Registration order is part of the behaviour: kind-specific removals and
//! shifts run before the family and global shifts, so each rule sees the
//! indices the previous ones produced.

use std::sync::Arc;

use mc_rewind_proto::{FieldValue, MetaValue, Metadata, PacketWrapper, Schema};

use super::rewriter::{MetaContext, MetaFilter, MetaOutcome, MetadataRewriter};
use crate::entity::EntityKind;
use crate::protocol::ids::legacy;
use crate::remapper::BlockItemRemapper;
use crate::tables::villager_profession;

/// Index of the pose entry 1.14 added to every entity.
const POSE_INDEX: u8 = 6;
/// Index of the bed position 1.14 added to living entities.
const BED_INDEX: u8 = 12;
/// Index of the mob flags byte carrying the "hands up" bit.
const MOB_FLAGS_INDEX: u8 = 13;
const HANDS_UP_BIT: i8 = 0x04;
/// Tameable flags bit 1.13.2 ocelots still understand.
const TAMED_BIT: i8 = 0x04;

pub fn metadata_rewriter_1_14(remapper: Arc<dyn BlockItemRemapper>) -> MetadataRewriter {
    let mut rw = MetadataRewriter::new(Schema::V1_13_2);

    let items = Arc::clone(&remapper);
    rw.register(MetaFilter::any(), move |meta, _| {
        match &mut meta.value {
            MetaValue::Slot(item) => *item = items.rewrite_item(item.take()),
            MetaValue::BlockState(state) => *state = items.remap_block_state(*state),
            _ => {}
        }
        MetaOutcome::Keep
    });

    rw.removed(MetaFilter::kind(EntityKind::Pillager).index(15));
    for index in 15..=18 {
        rw.removed(MetaFilter::kind(EntityKind::Fox).index(index));
    }
    for index in 15..=20 {
        rw.removed(MetaFilter::kind(EntityKind::Panda).index(index));
    }
    for index in 18..=20 {
        rw.removed(MetaFilter::kind(EntityKind::Cat).index(index));
    }

    // Raid celebration flag: illagers, ravagers and witches.
    rw.removed_with_shift(MetaFilter::family(EntityKind::AbstractRaider), 14);

    let particles = Arc::clone(&remapper);
    rw.register(
        MetaFilter::kind(EntityKind::AreaEffectCloud).index(10),
        move |meta, _| {
            if let MetaValue::Particle(particle) = &mut meta.value {
                *particle = particles.remap_particle(particle.clone());
            }
            MetaOutcome::Keep
        },
    );

    rw.register(
        MetaFilter::kind(EntityKind::FireworkRocket).index(8),
        |meta, _| {
            if let MetaValue::OptVarInt(value) = meta.value {
                meta.value = MetaValue::VarInt(value.unwrap_or(0));
            }
            MetaOutcome::Keep
        },
    );

    rw.removed_with_shift(MetaFilter::family(EntityKind::AbstractArrow), 9);

    // Head shake timer.
    rw.removed(MetaFilter::kind(EntityKind::Villager).index(15));
    rw.register(MetaFilter::kind(EntityKind::ZombieVillager).index(18), villager_data);
    rw.register(MetaFilter::kind(EntityKind::Villager).index(16), villager_data);

    // Leave room for the synthesized hands-up entry.
    rw.register(MetaFilter::family(EntityKind::Zombie), |meta, _| {
        if meta.index >= 16 {
            meta.index += 1;
        }
        MetaOutcome::Keep
    });

    rw.register(
        MetaFilter::family(EntityKind::AbstractSkeleton).index(MOB_FLAGS_INDEX),
        |meta, ctx| {
            if hands_up(meta) {
                ctx.create_meta(Metadata::new(14, MetaValue::Boolean(true)));
            }
            MetaOutcome::Keep
        },
    );
    rw.register(
        MetaFilter::family(EntityKind::Zombie).index(MOB_FLAGS_INDEX),
        |meta, ctx| {
            if hands_up(meta) {
                ctx.create_meta(Metadata::new(16, MetaValue::Boolean(true)));
            }
            MetaOutcome::Keep
        },
    );

    rw.register(MetaFilter::family(EntityKind::LivingEntity), |meta, ctx| {
        if meta.index == BED_INDEX {
            if let MetaValue::OptPosition(Some(bed)) = meta.value {
                let mut use_bed = PacketWrapper::create(legacy::USE_BED);
                use_bed.write(FieldValue::VarInt(ctx.entity_id));
                use_bed.write(FieldValue::Position(bed));
                match use_bed.into_packet() {
                    Ok(packet) => ctx.send_packet(packet),
                    Err(e) => ctx.warn(&format!("use bed for entity {}: {e}", ctx.entity_id)),
                }
            }
            return MetaOutcome::Elide;
        }
        if meta.index > BED_INDEX {
            meta.index -= 1;
        }
        MetaOutcome::Keep
    });

    rw.removed_with_shift(MetaFilter::any(), POSE_INDEX);

    rw.register(MetaFilter::any(), |meta, ctx| {
        if meta.meta_type().is_known_to(Schema::V1_13_2) {
            return MetaOutcome::Keep;
        }
        ctx.warn(&format!(
            "unhandled 1.14 metadata {} ({:?}) on {}",
            meta.index,
            meta.meta_type(),
            ctx.kind.map_or("unknown entity", EntityKind::name),
        ));
        MetaOutcome::Elide
    });

    // Ocelot "trusting" becomes the wild ocelot variant.
    rw.register(MetaFilter::kind(EntityKind::Ocelot).index(13), |meta, _| {
        meta.index = 15;
        meta.value = MetaValue::VarInt(0);
        MetaOutcome::Keep
    });
    rw.register(MetaFilter::kind(EntityKind::Cat), |meta, _| {
        match (meta.index, &mut meta.value) {
            (15, value) => *value = MetaValue::VarInt(1),
            (13, MetaValue::Byte(flags)) => *flags &= TAMED_BIT,
            _ => {}
        }
        MetaOutcome::Keep
    });

    rw
}

fn villager_data(meta: &mut Metadata, _: &mut MetaContext<'_>) -> MetaOutcome {
    if let MetaValue::VillagerData(data) = meta.value {
        meta.value = MetaValue::VarInt(villager_profession(data.profession));
        if meta.index == 16 {
            // Lands on 13 after the living and pose shifts.
            meta.index = 15;
        }
    }
    MetaOutcome::Keep
}

fn hands_up(meta: &Metadata) -> bool {
    matches!(meta.value, MetaValue::Byte(flags) if flags & HANDS_UP_BIT != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::enchantment::EnchantmentRewriter;
    use crate::metadata::rewriter::ListOutcome;
    use crate::remapper::TableRemapper;
    use crate::tables::MappingTables;
    use mc_rewind_proto::{BlockPos, Item, Packet, Particle, ParticleData, VillagerData};

    fn chain() -> (MetadataRewriter, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let tables = MappingTables::from_json(r#"{ "items": { "700": 650 } }"#).unwrap();
        let remapper = TableRemapper::new(
            Arc::new(tables),
            EnchantmentRewriter::default(),
            sink.clone(),
        );
        (metadata_rewriter_1_14(Arc::new(remapper)), sink)
    }

    fn run(
        kind: Option<EntityKind>,
        entries: Vec<Metadata>,
    ) -> (Vec<Metadata>, Vec<Packet>, Arc<RecordingSink>) {
        let (rw, sink) = chain();
        match rw.rewrite(5, kind, entries, sink.as_ref()) {
            ListOutcome::Rewritten { entries, packets } => (entries, packets, sink),
            ListOutcome::CancelPacket => panic!("list cancelled"),
        }
    }

    fn indices(entries: &[Metadata]) -> Vec<u8> {
        entries.iter().map(|m| m.index).collect()
    }

    fn find(entries: &[Metadata], index: u8) -> &MetaValue {
        &entries
            .iter()
            .find(|m| m.index == index)
            .unwrap_or_else(|| panic!("no entry at {index}"))
            .value
    }

    #[test]
    fn zombie_layout_and_hands_up() {
        let (out, packets, sink) = run(
            Some(EntityKind::Zombie),
            vec![
                Metadata::new(0, MetaValue::Byte(0)),
                Metadata::new(6, MetaValue::Pose(0)),
                Metadata::new(8, MetaValue::Float(20.0)),
                Metadata::new(12, MetaValue::OptPosition(None)),
                Metadata::new(13, MetaValue::Byte(0x04)),
                Metadata::new(14, MetaValue::Boolean(true)),
                Metadata::new(15, MetaValue::VarInt(0)),
                Metadata::new(16, MetaValue::Boolean(false)),
            ],
        );
        assert_eq!(indices(&out), vec![0, 7, 11, 12, 13, 15, 14]);
        assert_eq!(find(&out, 14), &MetaValue::Boolean(true));
        assert_eq!(find(&out, 15), &MetaValue::Boolean(false));
        assert!(packets.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn husk_inherits_zombie_rules() {
        let (out, _, _) = run(
            Some(EntityKind::Husk),
            vec![Metadata::new(16, MetaValue::Boolean(true))],
        );
        assert_eq!(indices(&out), vec![15]);
    }

    #[test]
    fn skeleton_hands_up() {
        let (out, _, _) = run(
            Some(EntityKind::Stray),
            vec![Metadata::new(13, MetaValue::Byte(0x05))],
        );
        assert_eq!(indices(&out), vec![11, 12]);
        assert_eq!(find(&out, 12), &MetaValue::Boolean(true));
    }

    #[test]
    fn villager_profession_collapses() {
        let (out, _, _) = run(
            Some(EntityKind::Villager),
            vec![
                Metadata::new(14, MetaValue::Boolean(false)),
                Metadata::new(15, MetaValue::VarInt(40)),
                Metadata::new(
                    16,
                    MetaValue::VillagerData(VillagerData {
                        villager_type: 0,
                        profession: 9,
                        level: 2,
                    }),
                ),
            ],
        );
        assert_eq!(indices(&out), vec![12, 13]);
        assert_eq!(find(&out, 13), &MetaValue::VarInt(1));
    }

    #[test]
    fn zombie_villager_profession() {
        let data = VillagerData {
            villager_type: 1,
            profession: 4,
            level: 1,
        };
        let (out, _, _) = run(
            Some(EntityKind::ZombieVillager),
            vec![
                Metadata::new(17, MetaValue::Boolean(true)),
                Metadata::new(18, MetaValue::VillagerData(data)),
            ],
        );
        assert_eq!(indices(&out), vec![16, 17]);
        assert_eq!(find(&out, 17), &MetaValue::VarInt(2));
    }

    #[test]
    fn pillager_loses_raid_fields() {
        let (out, _, _) = run(
            Some(EntityKind::Pillager),
            vec![
                Metadata::new(13, MetaValue::Byte(0)),
                Metadata::new(14, MetaValue::Boolean(true)),
                Metadata::new(15, MetaValue::Boolean(true)),
            ],
        );
        assert_eq!(indices(&out), vec![11]);
    }

    #[test]
    fn bed_position_becomes_use_bed() {
        let bed = BlockPos::new(10, 64, -3);
        let (out, packets, _) = run(
            Some(EntityKind::Player),
            vec![Metadata::new(12, MetaValue::OptPosition(Some(bed)))],
        );
        assert!(out.is_empty());
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].id, legacy::USE_BED);
        let mut expected = vec![5u8];
        expected.extend_from_slice(&bed.pack_legacy().to_be_bytes());
        assert_eq!(&packets[0].payload[..], &expected[..]);
    }

    #[test]
    fn cat_becomes_tame_ocelot() {
        let (out, _, _) = run(
            Some(EntityKind::Cat),
            vec![
                Metadata::new(14, MetaValue::Boolean(false)),
                Metadata::new(15, MetaValue::Byte(0x07)),
                Metadata::new(16, MetaValue::OptUuid(None)),
                Metadata::new(17, MetaValue::VarInt(3)),
                Metadata::new(18, MetaValue::Boolean(false)),
                Metadata::new(19, MetaValue::Boolean(false)),
                Metadata::new(20, MetaValue::VarInt(14)),
            ],
        );
        assert_eq!(indices(&out), vec![12, 13, 14, 15]);
        assert_eq!(find(&out, 13), &MetaValue::Byte(0x04));
        assert_eq!(find(&out, 15), &MetaValue::VarInt(1));
    }

    #[test]
    fn ocelot_trust_becomes_variant() {
        let (out, _, _) = run(
            Some(EntityKind::Ocelot),
            vec![Metadata::new(15, MetaValue::Boolean(true))],
        );
        assert_eq!(out, vec![Metadata::new(15, MetaValue::VarInt(0))]);
    }

    #[test]
    fn firework_shooter_defaults_to_zero() {
        let (out, _, _) = run(
            Some(EntityKind::FireworkRocket),
            vec![Metadata::new(8, MetaValue::OptVarInt(None))],
        );
        assert_eq!(out, vec![Metadata::new(7, MetaValue::VarInt(0))]);
    }

    #[test]
    fn arrow_piercing_removed() {
        let (out, _, _) = run(
            Some(EntityKind::Trident),
            vec![
                Metadata::new(7, MetaValue::Byte(1)),
                Metadata::new(9, MetaValue::Byte(3)),
                Metadata::new(10, MetaValue::VarInt(2)),
            ],
        );
        assert_eq!(indices(&out), vec![6, 8]);
    }

    #[test]
    fn item_entity_slot_is_rewritten() {
        let (out, _, _) = run(
            Some(EntityKind::Item),
            vec![Metadata::new(7, MetaValue::Slot(Some(Item::new(700, 2))))],
        );
        assert_eq!(out, vec![Metadata::new(6, MetaValue::Slot(Some(Item::new(650, 2))))]);
    }

    #[test]
    fn area_effect_cloud_particle() {
        let (out, _, _) = run(
            Some(EntityKind::AreaEffectCloud),
            vec![Metadata::new(
                10,
                MetaValue::Particle(Particle {
                    id: 14,
                    data: ParticleData::Dust {
                        red: 1.0,
                        green: 0.5,
                        blue: 0.0,
                        scale: 1.0,
                    },
                }),
            )],
        );
        match find(&out, 9) {
            MetaValue::Particle(p) => assert_eq!(p.id, 11),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_entity_gets_general_rules_only() {
        let (out, _, sink) = run(
            None,
            vec![
                Metadata::new(6, MetaValue::Pose(1)),
                Metadata::new(7, MetaValue::Byte(0)),
                Metadata::new(12, MetaValue::OptPosition(None)),
                Metadata::new(
                    16,
                    MetaValue::VillagerData(VillagerData {
                        villager_type: 0,
                        profession: 1,
                        level: 1,
                    }),
                ),
            ],
        );
        assert_eq!(indices(&out), vec![6, 11]);
        assert_eq!(sink.len(), 1);
    }
}
