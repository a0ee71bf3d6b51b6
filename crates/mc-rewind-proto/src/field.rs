//! Typed packet fields.
//!
//! A packet body is a sequence of fields whose layout is known only to the
//! handler that touches it. [`FieldType`] names a layout, [`FieldValue`]
//! holds one decoded value and knows how to put it back on the wire.

use bytes::{Buf, BufMut};

use crate::codec::{ensure_remaining, read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::item::{read_item, write_item, Item};
use crate::metadata::{read_metadata_list, write_metadata_list, Metadata};
use crate::schema::Schema;
use crate::types::{BlockPos, Uuid, VarInt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Boolean,
    Byte,
    UnsignedByte,
    Short,
    Int,
    Long,
    Float,
    Double,
    VarInt,
    String,
    Uuid,
    /// Block position in 1.13.2 packing.
    Position,
    /// Block position in 1.14 packing.
    Position1_14,
    Item,
    MetadataList(Schema),
    /// VarInt count followed by VarInts.
    VarIntArray,
    /// Short count followed by item stacks.
    ItemArray,
}

impl FieldType {
    fn is_integer(self) -> bool {
        matches!(
            self,
            FieldType::Byte
                | FieldType::UnsignedByte
                | FieldType::Short
                | FieldType::Int
                | FieldType::Long
                | FieldType::VarInt
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Boolean(bool),
    Byte(i8),
    UnsignedByte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    VarInt(i32),
    String(String),
    Uuid(Uuid),
    Position(BlockPos),
    Position1_14(BlockPos),
    Item(Option<Item>),
    MetadataList(Schema, Vec<Metadata>),
    VarIntArray(Vec<i32>),
    ItemArray(Vec<Option<Item>>),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Boolean(_) => FieldType::Boolean,
            FieldValue::Byte(_) => FieldType::Byte,
            FieldValue::UnsignedByte(_) => FieldType::UnsignedByte,
            FieldValue::Short(_) => FieldType::Short,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Long(_) => FieldType::Long,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Double(_) => FieldType::Double,
            FieldValue::VarInt(_) => FieldType::VarInt,
            FieldValue::String(_) => FieldType::String,
            FieldValue::Uuid(_) => FieldType::Uuid,
            FieldValue::Position(_) => FieldType::Position,
            FieldValue::Position1_14(_) => FieldType::Position1_14,
            FieldValue::Item(_) => FieldType::Item,
            FieldValue::MetadataList(schema, _) => FieldType::MetadataList(*schema),
            FieldValue::VarIntArray(_) => FieldType::VarIntArray,
            FieldValue::ItemArray(_) => FieldType::ItemArray,
        }
    }

    pub fn decode(field_type: FieldType, buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let value = match field_type {
            FieldType::Boolean => {
                ensure_remaining(buf, 1)?;
                FieldValue::Boolean(buf.get_u8() != 0)
            }
            FieldType::Byte => {
                ensure_remaining(buf, 1)?;
                FieldValue::Byte(buf.get_i8())
            }
            FieldType::UnsignedByte => {
                ensure_remaining(buf, 1)?;
                FieldValue::UnsignedByte(buf.get_u8())
            }
            FieldType::Short => {
                ensure_remaining(buf, 2)?;
                FieldValue::Short(buf.get_i16())
            }
            FieldType::Int => {
                ensure_remaining(buf, 4)?;
                FieldValue::Int(buf.get_i32())
            }
            FieldType::Long => {
                ensure_remaining(buf, 8)?;
                FieldValue::Long(buf.get_i64())
            }
            FieldType::Float => {
                ensure_remaining(buf, 4)?;
                FieldValue::Float(buf.get_f32())
            }
            FieldType::Double => {
                ensure_remaining(buf, 8)?;
                FieldValue::Double(buf.get_f64())
            }
            FieldType::VarInt => FieldValue::VarInt(VarInt::proto_decode(buf)?.0),
            FieldType::String => FieldValue::String(read_string(buf)?),
            FieldType::Uuid => FieldValue::Uuid(Uuid::proto_decode(buf)?),
            FieldType::Position => {
                ensure_remaining(buf, 8)?;
                FieldValue::Position(BlockPos::unpack_legacy(buf.get_i64()))
            }
            FieldType::Position1_14 => {
                ensure_remaining(buf, 8)?;
                FieldValue::Position1_14(BlockPos::unpack_1_14(buf.get_i64()))
            }
            FieldType::Item => FieldValue::Item(read_item(buf)?),
            FieldType::MetadataList(schema) => {
                FieldValue::MetadataList(schema, read_metadata_list(buf, schema)?)
            }
            FieldType::VarIntArray => {
                let count = VarInt::proto_decode(buf)?.0;
                let count = usize::try_from(count).map_err(|_| ProtoError::NegativeLength(count))?;
                let mut values = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    values.push(VarInt::proto_decode(buf)?.0);
                }
                FieldValue::VarIntArray(values)
            }
            FieldType::ItemArray => {
                ensure_remaining(buf, 2)?;
                let count = buf.get_i16();
                let count = usize::try_from(count)
                    .map_err(|_| ProtoError::NegativeLength(i32::from(count)))?;
                let mut items = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    items.push(read_item(buf)?);
                }
                FieldValue::ItemArray(items)
            }
        };
        Ok(value)
    }

    /// Encode the value. Only metadata lists can fail, when they hold a type
    /// their schema cannot represent.
    pub fn encode(&self, buf: &mut impl BufMut) -> Result<(), ProtoError> {
        match self {
            FieldValue::Boolean(v) => buf.put_u8(*v as u8),
            FieldValue::Byte(v) => buf.put_i8(*v),
            FieldValue::UnsignedByte(v) => buf.put_u8(*v),
            FieldValue::Short(v) => buf.put_i16(*v),
            FieldValue::Int(v) => buf.put_i32(*v),
            FieldValue::Long(v) => buf.put_i64(*v),
            FieldValue::Float(v) => buf.put_f32(*v),
            FieldValue::Double(v) => buf.put_f64(*v),
            FieldValue::VarInt(v) => VarInt(*v).proto_encode(buf),
            FieldValue::String(s) => write_string(buf, s),
            FieldValue::Uuid(uuid) => uuid.proto_encode(buf),
            FieldValue::Position(pos) => buf.put_i64(pos.pack_legacy()),
            FieldValue::Position1_14(pos) => buf.put_i64(pos.pack_1_14()),
            FieldValue::Item(item) => write_item(buf, item.as_ref()),
            FieldValue::MetadataList(schema, list) => write_metadata_list(buf, *schema, list)?,
            FieldValue::VarIntArray(values) => {
                VarInt(values.len() as i32).proto_encode(buf);
                for v in values {
                    VarInt(*v).proto_encode(buf);
                }
            }
            FieldValue::ItemArray(items) => {
                buf.put_i16(items.len() as i16);
                for item in items {
                    write_item(buf, item.as_ref());
                }
            }
        }
        Ok(())
    }

    /// Integer view of any integer-typed field.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Byte(v) => Some(i64::from(*v)),
            FieldValue::UnsignedByte(v) => Some(i64::from(*v)),
            FieldValue::Short(v) => Some(i64::from(*v)),
            FieldValue::Int(v) | FieldValue::VarInt(v) => Some(i64::from(*v)),
            FieldValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to another field type. Integers convert among each other when
    /// the value fits the target; the two position packings convert into
    /// each other.
    pub fn convert(self, to: FieldType) -> Result<FieldValue, ProtoError> {
        let from = self.field_type();
        if from == to {
            return Ok(self);
        }
        if from.is_integer() && to.is_integer() {
            let v = self.as_int().unwrap_or_default();
            let out_of_range = |_| ProtoError::IntegerOutOfRange { value: v, to };
            return Ok(match to {
                FieldType::Byte => FieldValue::Byte(i8::try_from(v).map_err(out_of_range)?),
                FieldType::UnsignedByte => {
                    FieldValue::UnsignedByte(u8::try_from(v).map_err(out_of_range)?)
                }
                FieldType::Short => FieldValue::Short(i16::try_from(v).map_err(out_of_range)?),
                FieldType::Int => FieldValue::Int(i32::try_from(v).map_err(out_of_range)?),
                FieldType::VarInt => FieldValue::VarInt(i32::try_from(v).map_err(out_of_range)?),
                _ => FieldValue::Long(v),
            });
        }
        match (self, to) {
            (FieldValue::Position(pos), FieldType::Position1_14) => Ok(FieldValue::Position1_14(pos)),
            (FieldValue::Position1_14(pos), FieldType::Position) => Ok(FieldValue::Position(pos)),
            _ => Err(ProtoError::FieldConversion { from, to }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn encoded(value: &FieldValue) -> Vec<u8> {
        let mut buf = BytesMut::new();
        value.encode(&mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn fixed_width_fields_are_big_endian() {
        assert_eq!(encoded(&FieldValue::Int(1)), vec![0, 0, 0, 1]);
        assert_eq!(encoded(&FieldValue::Short(-2)), vec![0xFF, 0xFE]);
        assert_eq!(encoded(&FieldValue::Double(1.0)), 1.0f64.to_be_bytes().to_vec());
    }

    #[test]
    fn decode_matches_encode() {
        let values = [
            FieldValue::Boolean(true),
            FieldValue::VarInt(300),
            FieldValue::String("minecraft:default".into()),
            FieldValue::Position1_14(BlockPos::new(-4, 70, 12)),
            FieldValue::VarIntArray(vec![1, 2, 3]),
            FieldValue::ItemArray(vec![None, Some(Item::new(5, 3))]),
        ];
        for value in values {
            let bytes = encoded(&value);
            let decoded = FieldValue::decode(value.field_type(), &mut &bytes[..]).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn integer_conversion_keeps_value() {
        let v = FieldValue::VarInt(0x23).convert(FieldType::Byte).unwrap();
        assert_eq!(v, FieldValue::Byte(0x23));
        let v = FieldValue::UnsignedByte(200).convert(FieldType::Int).unwrap();
        assert_eq!(v, FieldValue::Int(200));
        let v = FieldValue::VarInt(-1).convert(FieldType::Byte).unwrap();
        assert_eq!(v, FieldValue::Byte(-1));
    }

    #[test]
    fn narrowing_out_of_range_fails() {
        // 298 would wrap to 42 as a byte.
        let err = FieldValue::VarInt(298).convert(FieldType::Byte).unwrap_err();
        assert!(matches!(
            err,
            ProtoError::IntegerOutOfRange {
                value: 298,
                to: FieldType::Byte
            }
        ));
        assert!(FieldValue::Byte(-1).convert(FieldType::UnsignedByte).is_err());
        assert!(FieldValue::Long(i64::MAX).convert(FieldType::VarInt).is_err());
        assert!(FieldValue::Int(i32::MIN).convert(FieldType::Long).is_ok());
    }

    #[test]
    fn position_conversion_repacks() {
        let pos = BlockPos::new(10, 20, 30);
        let legacy = FieldValue::Position1_14(pos).convert(FieldType::Position).unwrap();
        assert_eq!(encoded(&legacy), pos.pack_legacy().to_be_bytes().to_vec());
    }

    #[test]
    fn incompatible_conversion_fails() {
        let err = FieldValue::String("x".into())
            .convert(FieldType::Int)
            .unwrap_err();
        assert!(matches!(
            err,
            ProtoError::FieldConversion {
                from: FieldType::String,
                to: FieldType::Int
            }
        ));
    }

    #[test]
    fn negative_item_array_length() {
        let data: &[u8] = &[0xFF, 0xFF];
        assert!(matches!(
            FieldValue::decode(FieldType::ItemArray, &mut &data[..]),
            Err(ProtoError::NegativeLength(-1))
        ));
    }
}
