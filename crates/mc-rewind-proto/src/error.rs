//! Protocol-level errors.

use thiserror::Error;

use crate::field::FieldType;
use crate::schema::Schema;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("buffer too short: need {needed} more bytes, have {remaining}")]
    BufferTooShort { needed: usize, remaining: usize },

    #[error("VarInt encoding error: {0}")]
    VarInt(#[from] crate::types::VarIntError),

    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    #[error("string of {len} chars exceeds maximum {max}")]
    StringTooLong { len: usize, max: usize },

    #[error("negative length: {0}")]
    NegativeLength(i32),

    #[error("NBT error: {0}")]
    Nbt(#[from] mc_rewind_nbt::NbtError),

    #[error("unknown metadata type id {0}")]
    UnknownMetaType(i32),

    #[error("metadata type id {type_id} has no encoding in {schema}")]
    UnsupportedMetaType { type_id: u8, schema: Schema },

    #[error("value {value} does not fit a {to:?} field")]
    IntegerOutOfRange { value: i64, to: FieldType },

    #[error("optional VarInt {0} has no value encoding")]
    OptVarIntOutOfRange(i32),

    #[error("cannot convert {from:?} field to {to:?}")]
    FieldConversion { from: FieldType, to: FieldType },

    #[error("expected {expected:?} value, got {got:?}")]
    FieldTypeMismatch { expected: FieldType, got: FieldType },

    #[error("no {field_type:?} field at index {index}")]
    FieldIndexOutOfRange { field_type: FieldType, index: usize },
}
