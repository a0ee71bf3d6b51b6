//! Base data types used throughout the Java play protocol.

use std::fmt;

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{ensure_remaining, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum VarIntError {
    #[error("buffer too short")]
    BufferTooShort,
    #[error("VarInt is too long (more than {max_bytes} bytes)")]
    TooManyBytes { max_bytes: usize },
}

// ---------------------------------------------------------------------------
// VarInt (i32 as unsigned LEB128 of its two's complement, no ZigZag)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarInt(pub i32);

impl VarInt {
    /// Maximum bytes a VarInt can occupy.
    pub const MAX_BYTES: usize = 5;

    /// Number of bytes the value occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        let mut value = self.0 as u32;
        let mut len = 1;
        while value & !0x7F != 0 {
            value >>= 7;
            len += 1;
        }
        len
    }
}

impl ProtoEncode for VarInt {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        let mut value = self.0 as u32;
        loop {
            if value & !0x7F == 0 {
                buf.put_u8(value as u8);
                return;
            }
            buf.put_u8((value & 0x7F | 0x80) as u8);
            value >>= 7;
        }
    }
}

impl ProtoDecode for VarInt {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let mut result: u32 = 0;
        let mut shift: u32 = 0;
        for _ in 0..Self::MAX_BYTES {
            if !buf.has_remaining() {
                return Err(VarIntError::BufferTooShort.into());
            }
            let byte = buf.get_u8();
            result |= ((byte & 0x7F) as u32) << shift;
            if byte & 0x80 == 0 {
                return Ok(VarInt(result as i32));
            }
            shift += 7;
        }
        Err(VarIntError::TooManyBytes {
            max_bytes: Self::MAX_BYTES,
        }
        .into())
    }
}

impl From<i32> for VarInt {
    fn from(v: i32) -> Self {
        VarInt(v)
    }
}

impl From<VarInt> for i32 {
    fn from(v: VarInt) -> Self {
        v.0
    }
}

impl fmt::Debug for VarInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarInt({})", self.0)
    }
}

impl fmt::Display for VarInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Uuid (two big-endian u64)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uuid {
    pub most_significant: u64,
    pub least_significant: u64,
}

impl Uuid {
    pub const ZERO: Self = Self {
        most_significant: 0,
        least_significant: 0,
    };

    pub fn new(most: u64, least: u64) -> Self {
        Self {
            most_significant: most,
            least_significant: least,
        }
    }
}

impl ProtoEncode for Uuid {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u64(self.most_significant);
        buf.put_u64(self.least_significant);
    }
}

impl ProtoDecode for Uuid {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure_remaining(buf, 16)?;
        Ok(Self {
            most_significant: buf.get_u64(),
            least_significant: buf.get_u64(),
        })
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hi = self.most_significant;
        let lo = self.least_significant;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            hi >> 32,
            (hi >> 16) & 0xFFFF,
            hi & 0xFFFF,
            lo >> 48,
            lo & 0xFFFF_FFFF_FFFF,
        )
    }
}

// ---------------------------------------------------------------------------
// BlockPos (i32 x, y, z packed into one i64)
// ---------------------------------------------------------------------------

/// A block position. The struct is version-neutral; the two packings are
/// chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// 1.13.2 packing: x (26 bits) | y (12 bits) | z (26 bits).
    pub fn pack_legacy(&self) -> i64 {
        ((self.x as i64 & 0x3FF_FFFF) << 38)
            | ((self.y as i64 & 0xFFF) << 26)
            | (self.z as i64 & 0x3FF_FFFF)
    }

    pub fn unpack_legacy(v: i64) -> Self {
        Self {
            x: (v >> 38) as i32,
            y: ((v << 26) >> 52) as i32,
            z: ((v << 38) >> 38) as i32,
        }
    }

    /// 1.14 packing: x (26 bits) | z (26 bits) | y (12 bits).
    pub fn pack_1_14(&self) -> i64 {
        ((self.x as i64 & 0x3FF_FFFF) << 38)
            | ((self.z as i64 & 0x3FF_FFFF) << 12)
            | (self.y as i64 & 0xFFF)
    }

    pub fn unpack_1_14(v: i64) -> Self {
        Self {
            x: (v >> 38) as i32,
            y: ((v << 52) >> 52) as i32,
            z: ((v << 26) >> 38) as i32,
        }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn encode_varint(value: i32) -> BytesMut {
        let mut buf = BytesMut::new();
        VarInt(value).proto_encode(&mut buf);
        buf
    }

    #[test]
    fn varint_known_encodings() {
        assert_eq!(&encode_varint(0)[..], &[0x00]);
        assert_eq!(&encode_varint(1)[..], &[0x01]);
        assert_eq!(&encode_varint(127)[..], &[0x7F]);
        assert_eq!(&encode_varint(128)[..], &[0x80, 0x01]);
        assert_eq!(&encode_varint(255)[..], &[0xFF, 0x01]);
        assert_eq!(&encode_varint(2_147_483_647)[..], &[0xFF, 0xFF, 0xFF, 0xFF, 0x07]);
        assert_eq!(&encode_varint(-1)[..], &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn varint_decode_negative() {
        let decoded = VarInt::proto_decode(&mut encode_varint(-2_147_483_648).freeze()).unwrap();
        assert_eq!(decoded.0, i32::MIN);
    }

    #[test]
    fn varint_encoded_len() {
        assert_eq!(VarInt(0).encoded_len(), 1);
        assert_eq!(VarInt(300).encoded_len(), 2);
        assert_eq!(VarInt(-1).encoded_len(), 5);
    }

    #[test]
    fn varint_buffer_too_short() {
        let data: &[u8] = &[0x80];
        assert!(VarInt::proto_decode(&mut &data[..]).is_err());
    }

    #[test]
    fn varint_too_long() {
        let data: &[u8] = &[0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        assert!(matches!(
            VarInt::proto_decode(&mut &data[..]),
            Err(ProtoError::VarInt(VarIntError::TooManyBytes { max_bytes: 5 }))
        ));
    }

    #[test]
    fn uuid_is_big_endian() {
        let u = Uuid::new(1, 2);
        let mut buf = BytesMut::new();
        u.proto_encode(&mut buf);
        assert_eq!(buf[7], 1);
        assert_eq!(buf[15], 2);
        assert_eq!(Uuid::proto_decode(&mut buf.freeze()).unwrap(), u);
    }

    #[test]
    fn uuid_display() {
        let u = Uuid::new(0x0123_4567_89AB_CDEF, 0xFEDC_BA98_7654_3210);
        assert_eq!(u.to_string(), "01234567-89ab-cdef-fedc-ba9876543210");
    }

    #[test]
    fn blockpos_packings_differ() {
        let pos = BlockPos::new(1, 2, 3);
        assert_ne!(pos.pack_legacy(), pos.pack_1_14());
        assert_eq!(pos.pack_1_14(), (1i64 << 38) | (3 << 12) | 2);
        assert_eq!(pos.pack_legacy(), (1i64 << 38) | (2 << 26) | 3);
    }

    #[test]
    fn blockpos_negative_coordinates() {
        let pos = BlockPos::new(-30_000_000, -64, 29_999_999);
        assert_eq!(BlockPos::unpack_legacy(pos.pack_legacy()), pos);
        assert_eq!(BlockPos::unpack_1_14(pos.pack_1_14()), pos);
    }

    #[test]
    fn blockpos_repack_between_schemas() {
        let pos = BlockPos::new(-12, 70, 400);
        let newer = pos.pack_1_14();
        let legacy = BlockPos::unpack_1_14(newer).pack_legacy();
        assert_eq!(BlockPos::unpack_legacy(legacy), pos);
    }
}
