//! Entity spawn, movement, metadata and lifecycle packets.

use mc_rewind_proto::{FieldType, FieldValue, MetaValue, Metadata, PacketWrapper, Schema};
use tracing::debug;

use super::ids::{legacy, newer};
use super::{coordinates, entity_id};
use crate::context::{CacheOutcome, Dimension};
use crate::entity::{EntityKind, ObjectKind};
use crate::error::RewriteError;
use crate::metadata::ListOutcome;
use crate::pipeline::{HandlerContext, PacketRemapper, Protocol};

/// Entity status a player sends on death.
const STATUS_DEATH: i64 = 3;
/// Equipment slots 0 (main hand) through 5 (helmet).
const EQUIPMENT_SLOTS: std::ops::RangeInclusive<i32> = 0..=5;
const DISPLAY_NAME_INDEX: u8 = 2;
const NAME_VISIBLE_INDEX: u8 = 3;

pub fn register(protocol: &mut Protocol) {
    protocol.register(
        newer::SPAWN_OBJECT,
        PacketRemapper::new(legacy::SPAWN_OBJECT)
            .passthrough(FieldType::VarInt) // entity id
            .passthrough(FieldType::Uuid)
            .passthrough(FieldType::VarInt) // type
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Byte) // pitch
            .passthrough(FieldType::Byte) // yaw
            .passthrough(FieldType::Int) // data
            .passthrough(FieldType::Short)
            .passthrough(FieldType::Short)
            .passthrough(FieldType::Short)
            .handler(spawn_object),
    );

    protocol.register(
        newer::SPAWN_EXPERIENCE_ORB,
        PacketRemapper::new(legacy::SPAWN_EXPERIENCE_ORB)
            .passthrough(FieldType::VarInt)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Double)
            .handler(|w, ctx| track_at_spawn(w, ctx, EntityKind::ExperienceOrb)),
    );

    protocol.register(
        newer::SPAWN_GLOBAL_ENTITY,
        PacketRemapper::new(legacy::SPAWN_GLOBAL_ENTITY)
            .passthrough(FieldType::VarInt)
            .passthrough(FieldType::Byte)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Double)
            .handler(|w, ctx| track_at_spawn(w, ctx, EntityKind::LightningBolt)),
    );

    protocol.register(
        newer::SPAWN_MOB,
        PacketRemapper::new(legacy::SPAWN_MOB)
            .passthrough(FieldType::VarInt) // entity id
            .passthrough(FieldType::Uuid)
            .passthrough(FieldType::VarInt) // type
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Byte) // yaw
            .passthrough(FieldType::Byte) // pitch
            .passthrough(FieldType::Byte) // head pitch
            .passthrough(FieldType::Short)
            .passthrough(FieldType::Short)
            .passthrough(FieldType::Short)
            .handler(spawn_mob),
    );

    protocol.register(
        newer::SPAWN_PAINTING,
        PacketRemapper::new(legacy::SPAWN_PAINTING)
            .passthrough(FieldType::VarInt)
            .passthrough(FieldType::Uuid)
            .passthrough(FieldType::VarInt) // motive
            .map(FieldType::Position1_14, FieldType::Position)
            .passthrough(FieldType::Byte) // direction
            .handler(|w, ctx| {
                let id = entity_id(w)?;
                ctx.conn.track(id, EntityKind::Painting);
                if let FieldValue::Position(pos) = w.get(FieldType::Position, 0)? {
                    let (x, y, z) = (f64::from(pos.x), f64::from(pos.y), f64::from(pos.z));
                    ctx.conn.cache_absolute(id, x, y, z);
                }
                Ok(())
            }),
    );

    protocol.register(
        newer::SPAWN_PLAYER,
        PacketRemapper::new(legacy::SPAWN_PLAYER)
            .passthrough(FieldType::VarInt)
            .passthrough(FieldType::Uuid)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Byte) // yaw
            .passthrough(FieldType::Byte) // pitch
            .handler(|w, ctx| {
                let id = entity_id(w)?;
                let list = w.read_metadata(Schema::V1_14)?;
                rewrite_metadata(w, ctx, id, Some(EntityKind::Player), list, NameInjection::None)?;
                track_unless_cancelled(w, ctx, EntityKind::Player)
            }),
    );

    protocol.register(
        newer::ENTITY_STATUS,
        PacketRemapper::new(legacy::ENTITY_STATUS)
            .passthrough(FieldType::Int) // entity id
            .passthrough(FieldType::Byte) // status
            .handler(|w, ctx| {
                if w.get_int(FieldType::Byte, 0)? != STATUS_DEATH {
                    return Ok(());
                }
                let id = w.get_int(FieldType::Int, 0)? as i32;
                if ctx.conn.kind_of(id) != Some(EntityKind::Player) {
                    return Ok(());
                }
                // Clear equipment so the client shows no ghost items.
                for slot in EQUIPMENT_SLOTS {
                    let mut equipment = PacketWrapper::create(legacy::ENTITY_EQUIPMENT);
                    equipment.write(FieldValue::VarInt(id));
                    equipment.write(FieldValue::VarInt(slot));
                    equipment.write(FieldValue::Item(None));
                    w.send_before(equipment.into_packet()?);
                }
                Ok(())
            }),
    );

    protocol.register(
        newer::JOIN_GAME,
        PacketRemapper::new(legacy::JOIN_GAME)
            .passthrough(FieldType::Int) // entity id
            .passthrough(FieldType::UnsignedByte) // game mode
            .passthrough(FieldType::Int) // dimension
            .handler(|w, ctx| {
                let id = w.get_int(FieldType::Int, 0)? as i32;
                ctx.conn.track(id, EntityKind::Player);
                set_dimension(ctx, w.get_int(FieldType::Int, 1)? as i32);

                w.write(FieldValue::UnsignedByte(0)); // difficulty
                w.passthrough(FieldType::UnsignedByte)?; // max players
                w.passthrough(FieldType::String)?; // level type
                w.read(FieldType::VarInt)?; // view distance
                Ok(())
            }),
    );

    for id in [newer::ENTITY_POSITION, newer::ENTITY_POSITION_AND_ROTATION] {
        let target = if id == newer::ENTITY_POSITION {
            legacy::ENTITY_RELATIVE_MOVE
        } else {
            legacy::ENTITY_LOOK_AND_RELATIVE_MOVE
        };
        protocol.register(
            id,
            PacketRemapper::new(target)
                .passthrough(FieldType::VarInt)
                .passthrough(FieldType::Short)
                .passthrough(FieldType::Short)
                .passthrough(FieldType::Short)
                .handler(relative_move),
        );
    }

    protocol.register(
        newer::DESTROY_ENTITIES,
        PacketRemapper::new(legacy::DESTROY_ENTITIES)
            .passthrough(FieldType::VarIntArray)
            .handler(|w, ctx| {
                if let FieldValue::VarIntArray(ids) = w.get(FieldType::VarIntArray, 0)? {
                    ctx.conn.untrack_all(ids);
                }
                Ok(())
            }),
    );

    protocol.register(
        newer::RESPAWN,
        PacketRemapper::new(legacy::RESPAWN)
            .passthrough(FieldType::Int) // dimension
            .handler(|w, ctx| {
                set_dimension(ctx, w.get_int(FieldType::Int, 0)? as i32);
                w.write(FieldValue::UnsignedByte(0)); // difficulty
                Ok(())
            }),
    );

    protocol.register(
        newer::ENTITY_METADATA,
        PacketRemapper::new(legacy::ENTITY_METADATA)
            .passthrough(FieldType::VarInt)
            .handler(|w, ctx| {
                let id = entity_id(w)?;
                let kind = ctx.conn.kind_of(id);
                let list = w.read_metadata(Schema::V1_14)?;
                let injection = kind
                    .and_then(|kind| ctx.shared.entities.resolve(kind))
                    .and_then(|r| r.display_name)
                    .map_or(NameInjection::None, NameInjection::Update);
                rewrite_metadata(w, ctx, id, kind, list, injection)
            }),
    );

    protocol.register(
        newer::ENTITY_TELEPORT,
        PacketRemapper::new(legacy::ENTITY_TELEPORT)
            .passthrough(FieldType::VarInt)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Double)
            .passthrough(FieldType::Double)
            .handler(|w, ctx| {
                let id = entity_id(w)?;
                let (x, y, z) = coordinates(w, 0)?;
                ctx.conn.cache_absolute(id, x, y, z);
                Ok(())
            }),
    );
}

fn track_unless_cancelled(
    w: &mut PacketWrapper,
    ctx: &mut HandlerContext<'_>,
    kind: EntityKind,
) -> Result<(), RewriteError> {
    if w.is_cancelled() {
        return Ok(());
    }
    track_at_spawn(w, ctx, kind)
}

/// Track a spawned entity and cache the position in its first three doubles.
fn track_at_spawn(
    w: &mut PacketWrapper,
    ctx: &mut HandlerContext<'_>,
    kind: EntityKind,
) -> Result<(), RewriteError> {
    let id = entity_id(w)?;
    ctx.conn.track(id, kind);
    let (x, y, z) = coordinates(w, 0)?;
    ctx.conn.cache_absolute(id, x, y, z);
    Ok(())
}

fn spawn_object(w: &mut PacketWrapper, ctx: &mut HandlerContext<'_>) -> Result<(), RewriteError> {
    let id = entity_id(w)?;
    let type_id = w.get_int(FieldType::VarInt, 1)?;
    let Some(kind) = i32::try_from(type_id).ok().and_then(EntityKind::from_id) else {
        ctx.warn(&format!("unknown 1.14 object type {type_id} for entity {id}"));
        w.cancel();
        return Ok(());
    };

    let Some(replacement) = ctx.shared.entities.resolve(kind) else {
        ctx.warn(&format!("could not find 1.13.2 entity type for 1.14 {kind}"));
        w.cancel();
        return Ok(());
    };
    let legacy_kind = replacement.legacy;
    let Some(object) = ObjectKind::from_legacy(legacy_kind) else {
        ctx.warn(&format!("1.13.2 {legacy_kind} cannot be spawned as an object"));
        w.cancel();
        return Ok(());
    };
    // 1.13.2 sends the object type as a byte.
    w.replace(FieldType::VarInt, 1, FieldValue::Byte(object.id() as i8))?;

    let data = w.get_int(FieldType::Int, 0)? as i32;
    let data = match object {
        ObjectKind::Minecart => match legacy_kind.minecart_data() {
            Some(variant) if variant != 0 => variant,
            _ => data,
        },
        ObjectKind::FallingBlock => ctx.shared.remapper.remap_block_state(data),
        _ if legacy_kind.is_arrow() => data + 1,
        _ => data,
    };
    w.set(0, FieldValue::Int(data))?;
    track_at_spawn(w, ctx, kind)
}

fn spawn_mob(w: &mut PacketWrapper, ctx: &mut HandlerContext<'_>) -> Result<(), RewriteError> {
    let id = entity_id(w)?;
    let type_id = w.get_int(FieldType::VarInt, 1)? as i32;
    let Some(kind) = EntityKind::from_id(type_id) else {
        ctx.warn(&format!("unknown 1.14 mob type {type_id} for entity {id}"));
        w.cancel();
        return Ok(());
    };

    let Some(replacement) = ctx.shared.entities.resolve(kind) else {
        ctx.warn(&format!("could not find 1.13.2 entity type for 1.14 {kind}"));
        w.cancel();
        return Ok(());
    };
    w.set(1, FieldValue::VarInt(replacement.legacy.id()))?;

    let list = w.read_metadata(Schema::V1_14)?;
    let injection = replacement
        .display_name
        .map_or(NameInjection::None, NameInjection::Spawn);
    rewrite_metadata(w, ctx, id, Some(kind), list, injection)?;
    track_unless_cancelled(w, ctx, kind)
}

fn relative_move(w: &mut PacketWrapper, ctx: &mut HandlerContext<'_>) -> Result<(), RewriteError> {
    let id = entity_id(w)?;
    let dx = w.get_int(FieldType::Short, 0)? as i16;
    let dy = w.get_int(FieldType::Short, 1)? as i16;
    let dz = w.get_int(FieldType::Short, 2)? as i16;
    if ctx.conn.cache_relative_move(id, dx, dy, dz) == CacheOutcome::StoredWithoutBaseline {
        ctx.warn(&format!(
            "relative move for entity {id} before any absolute position, assuming origin"
        ));
    }
    Ok(())
}

fn set_dimension(ctx: &mut HandlerContext<'_>, id: i32) {
    match Dimension::from_id(id) {
        Some(dimension) => {
            debug!("dimension changed to {dimension:?}");
            ctx.conn.set_dimension(dimension);
        }
        None => ctx.warn(&format!("unknown dimension id {id}")),
    }
}

/// How a replacement's display name is applied to a metadata list.
#[derive(Debug, Clone, Copy)]
enum NameInjection {
    None,
    /// Fill a missing or empty custom name and make it visible.
    Spawn(&'static str),
    /// Fill a custom name that is present but empty.
    Update(&'static str),
}

/// Run the metadata chain and queue the 1.13.2 list on the wrapper.
fn rewrite_metadata(
    w: &mut PacketWrapper,
    ctx: &mut HandlerContext<'_>,
    id: i32,
    kind: Option<EntityKind>,
    list: Vec<Metadata>,
    injection: NameInjection,
) -> Result<(), RewriteError> {
    let shared = ctx.shared;
    match shared
        .metadata
        .rewrite(id, kind, list, shared.diagnostics.as_ref())
    {
        ListOutcome::CancelPacket => {
            w.cancel();
        }
        ListOutcome::Rewritten {
            mut entries,
            packets,
        } => {
            for packet in packets {
                w.send_before(packet);
            }
            inject_display_name(&mut entries, injection);
            w.write(FieldValue::MetadataList(Schema::V1_13_2, entries));
        }
    }
    Ok(())
}

fn inject_display_name(entries: &mut Vec<Metadata>, injection: NameInjection) {
    let (name, spawn) = match injection {
        NameInjection::None => return,
        NameInjection::Spawn(name) => (name, true),
        NameInjection::Update(name) => (name, false),
    };
    let json = serde_json::json!({ "text": name }).to_string();

    let filled = match entries.iter_mut().find(|m| m.index == DISPLAY_NAME_INDEX) {
        Some(meta) => match &mut meta.value {
            MetaValue::OptChat(current) if current.as_deref().map_or(true, str::is_empty) => {
                *current = Some(json);
                true
            }
            _ => false,
        },
        None if spawn => {
            entries.push(Metadata::new(DISPLAY_NAME_INDEX, MetaValue::OptChat(Some(json))));
            true
        }
        None => false,
    };
    if !(filled && spawn) {
        return;
    }
    match entries.iter_mut().find(|m| m.index == NAME_VISIBLE_INDEX) {
        Some(meta) => meta.value = MetaValue::Boolean(true),
        None => entries.push(Metadata::new(NAME_VISIBLE_INDEX, MetaValue::Boolean(true))),
    }
}
