//! Entity metadata: the positional, typed attribute list attached to spawn
//! and metadata-update packets.
//!
//! List wire format: repeated `u8 index`, `VarInt type`, value; terminated
//! by index `0xFF`. Type ids 0-15 are shared by 1.13.2 and 1.14; 1.14 adds
//! 16 (villager data), 17 (optional VarInt) and 18 (pose). Position values
//! follow the packing of whichever schema is being read or written.

use bytes::{Buf, BufMut};
use mc_rewind_nbt::{read_optional_nbt, write_optional_nbt, NbtRoot};

use crate::codec::{ensure_remaining, read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::item::{read_item, write_item, Item};
use crate::schema::Schema;
use crate::types::{BlockPos, Uuid, VarInt};

/// Index byte that terminates a metadata list.
pub const END_OF_METADATA: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaType {
    Byte,
    VarInt,
    Float,
    String,
    Chat,
    OptChat,
    Slot,
    Boolean,
    Rotation,
    Position,
    OptPosition,
    Direction,
    OptUuid,
    BlockState,
    Nbt,
    Particle,
    VillagerData,
    OptVarInt,
    Pose,
}

impl MetaType {
    const ALL: [MetaType; 19] = [
        MetaType::Byte,
        MetaType::VarInt,
        MetaType::Float,
        MetaType::String,
        MetaType::Chat,
        MetaType::OptChat,
        MetaType::Slot,
        MetaType::Boolean,
        MetaType::Rotation,
        MetaType::Position,
        MetaType::OptPosition,
        MetaType::Direction,
        MetaType::OptUuid,
        MetaType::BlockState,
        MetaType::Nbt,
        MetaType::Particle,
        MetaType::VillagerData,
        MetaType::OptVarInt,
        MetaType::Pose,
    ];

    /// Wire id. Identical in both schemas for every type the older one knows.
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: i32) -> Option<Self> {
        usize::try_from(id).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    /// Whether `schema` has an encoding for this type.
    pub fn is_known_to(self, schema: Schema) -> bool {
        self.id() <= schema.max_meta_type()
    }
}

/// 1.14 villager appearance: biome type, profession and trade level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VillagerData {
    pub villager_type: i32,
    pub profession: i32,
    pub level: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParticleData {
    None,
    BlockState(i32),
    Dust {
        red: f32,
        green: f32,
        blue: f32,
        scale: f32,
    },
    Item(Option<Item>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: i32,
    pub data: ParticleData,
}

impl Particle {
    pub fn read(buf: &mut impl Buf, schema: Schema) -> Result<Self, ProtoError> {
        let id = VarInt::proto_decode(buf)?.0;
        let ids = schema.particle_ids();
        let data = if id == ids.block || id == ids.falling_dust {
            ParticleData::BlockState(VarInt::proto_decode(buf)?.0)
        } else if id == ids.dust {
            ensure_remaining(buf, 16)?;
            ParticleData::Dust {
                red: buf.get_f32(),
                green: buf.get_f32(),
                blue: buf.get_f32(),
                scale: buf.get_f32(),
            }
        } else if id == ids.item {
            ParticleData::Item(read_item(buf)?)
        } else {
            ParticleData::None
        };
        Ok(Self { id, data })
    }

    pub fn write(&self, buf: &mut impl BufMut) {
        VarInt(self.id).proto_encode(buf);
        match &self.data {
            ParticleData::None => {}
            ParticleData::BlockState(state) => VarInt(*state).proto_encode(buf),
            ParticleData::Dust {
                red,
                green,
                blue,
                scale,
            } => {
                buf.put_f32(*red);
                buf.put_f32(*green);
                buf.put_f32(*blue);
                buf.put_f32(*scale);
            }
            ParticleData::Item(item) => write_item(buf, item.as_ref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Byte(i8),
    VarInt(i32),
    Float(f32),
    String(String),
    /// JSON text component.
    Chat(String),
    OptChat(Option<String>),
    Slot(Option<Item>),
    Boolean(bool),
    Rotation(f32, f32, f32),
    Position(BlockPos),
    OptPosition(Option<BlockPos>),
    Direction(i32),
    OptUuid(Option<Uuid>),
    BlockState(i32),
    Nbt(Option<NbtRoot>),
    Particle(Particle),
    VillagerData(VillagerData),
    OptVarInt(Option<i32>),
    Pose(i32),
}

impl MetaValue {
    pub fn meta_type(&self) -> MetaType {
        match self {
            MetaValue::Byte(_) => MetaType::Byte,
            MetaValue::VarInt(_) => MetaType::VarInt,
            MetaValue::Float(_) => MetaType::Float,
            MetaValue::String(_) => MetaType::String,
            MetaValue::Chat(_) => MetaType::Chat,
            MetaValue::OptChat(_) => MetaType::OptChat,
            MetaValue::Slot(_) => MetaType::Slot,
            MetaValue::Boolean(_) => MetaType::Boolean,
            MetaValue::Rotation(..) => MetaType::Rotation,
            MetaValue::Position(_) => MetaType::Position,
            MetaValue::OptPosition(_) => MetaType::OptPosition,
            MetaValue::Direction(_) => MetaType::Direction,
            MetaValue::OptUuid(_) => MetaType::OptUuid,
            MetaValue::BlockState(_) => MetaType::BlockState,
            MetaValue::Nbt(_) => MetaType::Nbt,
            MetaValue::Particle(_) => MetaType::Particle,
            MetaValue::VillagerData(_) => MetaType::VillagerData,
            MetaValue::OptVarInt(_) => MetaType::OptVarInt,
            MetaValue::Pose(_) => MetaType::Pose,
        }
    }

    fn read(buf: &mut impl Buf, meta_type: MetaType, schema: Schema) -> Result<Self, ProtoError> {
        let value = match meta_type {
            MetaType::Byte => {
                ensure_remaining(buf, 1)?;
                MetaValue::Byte(buf.get_i8())
            }
            MetaType::VarInt => MetaValue::VarInt(VarInt::proto_decode(buf)?.0),
            MetaType::Float => {
                ensure_remaining(buf, 4)?;
                MetaValue::Float(buf.get_f32())
            }
            MetaType::String => MetaValue::String(read_string(buf)?),
            MetaType::Chat => MetaValue::Chat(read_string(buf)?),
            MetaType::OptChat => MetaValue::OptChat(if read_bool(buf)? {
                Some(read_string(buf)?)
            } else {
                None
            }),
            MetaType::Slot => MetaValue::Slot(read_item(buf)?),
            MetaType::Boolean => MetaValue::Boolean(read_bool(buf)?),
            MetaType::Rotation => {
                ensure_remaining(buf, 12)?;
                MetaValue::Rotation(buf.get_f32(), buf.get_f32(), buf.get_f32())
            }
            MetaType::Position => MetaValue::Position(read_position(buf, schema)?),
            MetaType::OptPosition => MetaValue::OptPosition(if read_bool(buf)? {
                Some(read_position(buf, schema)?)
            } else {
                None
            }),
            MetaType::Direction => MetaValue::Direction(VarInt::proto_decode(buf)?.0),
            MetaType::OptUuid => MetaValue::OptUuid(if read_bool(buf)? {
                Some(Uuid::proto_decode(buf)?)
            } else {
                None
            }),
            MetaType::BlockState => MetaValue::BlockState(VarInt::proto_decode(buf)?.0),
            MetaType::Nbt => MetaValue::Nbt(read_optional_nbt(buf)?),
            MetaType::Particle => MetaValue::Particle(Particle::read(buf, schema)?),
            MetaType::VillagerData => MetaValue::VillagerData(VillagerData {
                villager_type: VarInt::proto_decode(buf)?.0,
                profession: VarInt::proto_decode(buf)?.0,
                level: VarInt::proto_decode(buf)?.0,
            }),
            MetaType::OptVarInt => {
                // 0 means absent, otherwise value + 1.
                let raw = VarInt::proto_decode(buf)?.0;
                let value = match raw {
                    0 => None,
                    _ => Some(raw.checked_sub(1).ok_or(ProtoError::OptVarIntOutOfRange(raw))?),
                };
                MetaValue::OptVarInt(value)
            }
            MetaType::Pose => MetaValue::Pose(VarInt::proto_decode(buf)?.0),
        };
        Ok(value)
    }

    fn write(&self, buf: &mut impl BufMut, schema: Schema) {
        match self {
            MetaValue::Byte(v) => buf.put_i8(*v),
            MetaValue::VarInt(v)
            | MetaValue::Direction(v)
            | MetaValue::BlockState(v)
            | MetaValue::Pose(v) => VarInt(*v).proto_encode(buf),
            MetaValue::Float(v) => buf.put_f32(*v),
            MetaValue::String(s) | MetaValue::Chat(s) => write_string(buf, s),
            MetaValue::OptChat(s) => {
                buf.put_u8(s.is_some() as u8);
                if let Some(s) = s {
                    write_string(buf, s);
                }
            }
            MetaValue::Slot(item) => write_item(buf, item.as_ref()),
            MetaValue::Boolean(v) => buf.put_u8(*v as u8),
            MetaValue::Rotation(x, y, z) => {
                buf.put_f32(*x);
                buf.put_f32(*y);
                buf.put_f32(*z);
            }
            MetaValue::Position(pos) => write_position(buf, pos, schema),
            MetaValue::OptPosition(pos) => {
                buf.put_u8(pos.is_some() as u8);
                if let Some(pos) = pos {
                    write_position(buf, pos, schema);
                }
            }
            MetaValue::OptUuid(uuid) => {
                buf.put_u8(uuid.is_some() as u8);
                if let Some(uuid) = uuid {
                    uuid.proto_encode(buf);
                }
            }
            MetaValue::Nbt(root) => write_optional_nbt(buf, root.as_ref()),
            MetaValue::Particle(particle) => particle.write(buf),
            MetaValue::VillagerData(data) => {
                VarInt(data.villager_type).proto_encode(buf);
                VarInt(data.profession).proto_encode(buf);
                VarInt(data.level).proto_encode(buf);
            }
            MetaValue::OptVarInt(v) => VarInt(v.map_or(0, |v| v.wrapping_add(1))).proto_encode(buf),
        }
    }
}

/// One positional attribute of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub index: u8,
    pub value: MetaValue,
}

impl Metadata {
    pub fn new(index: u8, value: MetaValue) -> Self {
        Self { index, value }
    }

    pub fn meta_type(&self) -> MetaType {
        self.value.meta_type()
    }
}

/// Read a full metadata list in `schema`'s encoding.
pub fn read_metadata_list(buf: &mut impl Buf, schema: Schema) -> Result<Vec<Metadata>, ProtoError> {
    let mut list = Vec::new();
    loop {
        ensure_remaining(buf, 1)?;
        let index = buf.get_u8();
        if index == END_OF_METADATA {
            return Ok(list);
        }
        let type_id = VarInt::proto_decode(buf)?.0;
        let meta_type = MetaType::from_id(type_id)
            .filter(|t| t.is_known_to(schema))
            .ok_or(ProtoError::UnknownMetaType(type_id))?;
        let value = MetaValue::read(buf, meta_type, schema)?;
        list.push(Metadata { index, value });
    }
}

/// Write a metadata list in `schema`'s encoding. Nothing is written when an
/// entry has a type the schema cannot represent.
pub fn write_metadata_list(
    buf: &mut impl BufMut,
    schema: Schema,
    list: &[Metadata],
) -> Result<(), ProtoError> {
    if let Some(bad) = list.iter().find(|m| !m.meta_type().is_known_to(schema)) {
        return Err(ProtoError::UnsupportedMetaType {
            type_id: bad.meta_type().id(),
            schema,
        });
    }
    for meta in list {
        buf.put_u8(meta.index);
        VarInt(meta.meta_type().id() as i32).proto_encode(buf);
        meta.value.write(buf, schema);
    }
    buf.put_u8(END_OF_METADATA);
    Ok(())
}

fn read_bool(buf: &mut impl Buf) -> Result<bool, ProtoError> {
    ensure_remaining(buf, 1)?;
    Ok(buf.get_u8() != 0)
}

fn read_position(buf: &mut impl Buf, schema: Schema) -> Result<BlockPos, ProtoError> {
    ensure_remaining(buf, 8)?;
    let packed = buf.get_i64();
    Ok(match schema {
        Schema::V1_13_2 => BlockPos::unpack_legacy(packed),
        Schema::V1_14 => BlockPos::unpack_1_14(packed),
    })
}

fn write_position(buf: &mut impl BufMut, pos: &BlockPos, schema: Schema) {
    buf.put_i64(match schema {
        Schema::V1_13_2 => pos.pack_legacy(),
        Schema::V1_14 => pos.pack_1_14(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn encode(schema: Schema, list: &[Metadata]) -> BytesMut {
        let mut buf = BytesMut::new();
        write_metadata_list(&mut buf, schema, list).unwrap();
        buf
    }

    #[test]
    fn meta_type_ids() {
        assert_eq!(MetaType::Byte.id(), 0);
        assert_eq!(MetaType::Particle.id(), 15);
        assert_eq!(MetaType::Pose.id(), 18);
        assert_eq!(MetaType::from_id(16), Some(MetaType::VillagerData));
        assert_eq!(MetaType::from_id(19), None);
        assert_eq!(MetaType::from_id(-1), None);
    }

    #[test]
    fn legacy_schema_rejects_new_types() {
        assert!(MetaType::Particle.is_known_to(Schema::V1_13_2));
        assert!(!MetaType::Pose.is_known_to(Schema::V1_13_2));
        assert!(MetaType::Pose.is_known_to(Schema::V1_14));
    }

    #[test]
    fn byte_entry_bytes() {
        let buf = encode(Schema::V1_14, &[Metadata::new(0, MetaValue::Byte(0x20))]);
        assert_eq!(&buf[..], &[0, 0, 0x20, 0xFF]);
    }

    #[test]
    fn empty_list_is_terminator_only() {
        let buf = encode(Schema::V1_13_2, &[]);
        assert_eq!(&buf[..], &[0xFF]);
        let decoded = read_metadata_list(&mut buf.freeze(), Schema::V1_13_2).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn mixed_list_decodes() {
        let list = vec![
            Metadata::new(0, MetaValue::Byte(0)),
            Metadata::new(2, MetaValue::OptChat(Some("{\"text\":\"Bob\"}".into()))),
            Metadata::new(6, MetaValue::Pose(1)),
            Metadata::new(8, MetaValue::Float(20.0)),
            Metadata::new(12, MetaValue::OptPosition(Some(BlockPos::new(5, 64, -9)))),
            Metadata::new(16, MetaValue::VillagerData(VillagerData {
                villager_type: 2,
                profession: 9,
                level: 1,
            })),
            Metadata::new(17, MetaValue::OptVarInt(None)),
        ];
        let buf = encode(Schema::V1_14, &list);
        let decoded = read_metadata_list(&mut buf.freeze(), Schema::V1_14).unwrap();
        assert_eq!(decoded, list);
    }

    #[test]
    fn position_follows_schema_packing() {
        let pos = BlockPos::new(1, 2, 3);
        let list = [Metadata::new(9, MetaValue::Position(pos))];
        let newer = encode(Schema::V1_14, &list);
        let legacy = encode(Schema::V1_13_2, &list);
        assert_eq!(&newer[3..11], &pos.pack_1_14().to_be_bytes());
        assert_eq!(&legacy[3..11], &pos.pack_legacy().to_be_bytes());
    }

    #[test]
    fn opt_varint_offsets_by_one() {
        let buf = encode(Schema::V1_14, &[Metadata::new(8, MetaValue::OptVarInt(Some(4)))]);
        assert_eq!(&buf[..], &[8, 17, 5, 0xFF]);
    }

    #[test]
    fn opt_varint_wire_extremes() {
        let decode = |raw: i32| {
            let mut buf = BytesMut::new();
            buf.put_u8(8);
            VarInt(17).proto_encode(&mut buf);
            VarInt(raw).proto_encode(&mut buf);
            buf.put_u8(0xFF);
            read_metadata_list(&mut buf.freeze(), Schema::V1_14)
        };
        assert_eq!(
            decode(0).unwrap(),
            vec![Metadata::new(8, MetaValue::OptVarInt(None))]
        );
        assert_eq!(
            decode(i32::MAX).unwrap(),
            vec![Metadata::new(8, MetaValue::OptVarInt(Some(i32::MAX - 1)))]
        );
        assert!(matches!(
            decode(i32::MIN),
            Err(ProtoError::OptVarIntOutOfRange(i32::MIN))
        ));
    }

    #[test]
    fn list_truncated_mid_entry_fails() {
        // Float entry at index 8 with only two of its four bytes.
        let data: &[u8] = &[8, 2, 0x41, 0x20];
        assert!(matches!(
            read_metadata_list(&mut &data[..], Schema::V1_14),
            Err(ProtoError::BufferTooShort { .. })
        ));
        // Missing terminator.
        let data: &[u8] = &[0, 0, 0x01];
        assert!(read_metadata_list(&mut &data[..], Schema::V1_14).is_err());
    }

    #[test]
    fn writing_new_type_to_legacy_fails() {
        let mut buf = BytesMut::new();
        let err = write_metadata_list(
            &mut buf,
            Schema::V1_13_2,
            &[Metadata::new(6, MetaValue::Pose(0))],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ProtoError::UnsupportedMetaType { type_id: 18, .. }
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn legacy_reader_rejects_new_type_ids() {
        let data: &[u8] = &[6, 18, 0, 0xFF];
        assert!(matches!(
            read_metadata_list(&mut &data[..], Schema::V1_13_2),
            Err(ProtoError::UnknownMetaType(18))
        ));
    }

    #[test]
    fn particle_ids_follow_schema() {
        let dust_1_14 = Particle {
            id: 14,
            data: ParticleData::Dust {
                red: 1.0,
                green: 0.0,
                blue: 0.0,
                scale: 1.0,
            },
        };
        let mut buf = BytesMut::new();
        dust_1_14.write(&mut buf);
        let decoded = Particle::read(&mut buf.clone().freeze(), Schema::V1_14).unwrap();
        assert_eq!(decoded, dust_1_14);
        // Under the 1.13.2 table id 14 carries no data.
        let legacy = Particle::read(&mut buf.freeze(), Schema::V1_13_2).unwrap();
        assert_eq!(legacy.data, ParticleData::None);
    }

    #[test]
    fn missing_terminator_is_an_error() {
        let data: &[u8] = &[0, 0, 1];
        assert!(read_metadata_list(&mut &data[..], Schema::V1_14).is_err());
    }
}
