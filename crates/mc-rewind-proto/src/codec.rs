//! Protocol encoding/decoding traits and helpers.

use bytes::{Buf, BufMut};

use crate::error::ProtoError;
use crate::types::VarInt;

/// Maximum characters in a protocol string.
pub const MAX_STRING_CHARS: usize = 32767;

/// Encode a value onto a buffer.
pub trait ProtoEncode {
    fn proto_encode(&self, buf: &mut impl BufMut);
}

/// Decode a value from a buffer.
pub trait ProtoDecode: Sized {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError>;
}

/// Fail with `BufferTooShort` unless `needed` bytes remain.
pub fn ensure_remaining(buf: &impl Buf, needed: usize) -> Result<(), ProtoError> {
    if buf.remaining() < needed {
        return Err(ProtoError::BufferTooShort {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

/// Write a Java protocol string (VarInt byte length + UTF-8).
pub fn write_string(buf: &mut impl BufMut, s: &str) {
    VarInt(s.len() as i32).proto_encode(buf);
    buf.put_slice(s.as_bytes());
}

/// Read a Java protocol string (VarInt byte length + UTF-8).
pub fn read_string(buf: &mut impl Buf) -> Result<String, ProtoError> {
    let len = VarInt::proto_decode(buf)?.0;
    if len < 0 {
        return Err(ProtoError::NegativeLength(len));
    }
    let len = len as usize;
    // Up to four UTF-8 bytes per char.
    if len > MAX_STRING_CHARS * 4 {
        return Err(ProtoError::StringTooLong {
            len,
            max: MAX_STRING_CHARS,
        });
    }
    ensure_remaining(buf, len)?;
    let data = buf.copy_to_bytes(len);
    let s = String::from_utf8(data.to_vec()).map_err(|_| ProtoError::InvalidUtf8)?;
    let chars = s.chars().count();
    if chars > MAX_STRING_CHARS {
        return Err(ProtoError::StringTooLong {
            len: chars,
            max: MAX_STRING_CHARS,
        });
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn string_roundtrip() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "minecraft:default");
        let result = read_string(&mut buf.freeze()).unwrap();
        assert_eq!(result, "minecraft:default");
    }

    #[test]
    fn string_length_prefix_is_plain_varint() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "abc");
        assert_eq!(&buf[..], &[3, b'a', b'b', b'c']);
    }

    #[test]
    fn string_unicode() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "§7Multishot");
        let result = read_string(&mut buf.freeze()).unwrap();
        assert_eq!(result, "§7Multishot");
    }

    #[test]
    fn string_buffer_too_short() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "Hello");
        let truncated = buf.freeze().slice(..3);
        assert!(matches!(
            read_string(&mut truncated.clone()),
            Err(ProtoError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn string_negative_length() {
        let mut buf = BytesMut::new();
        VarInt(-1).proto_encode(&mut buf);
        assert!(matches!(
            read_string(&mut buf.freeze()),
            Err(ProtoError::NegativeLength(-1))
        ));
    }
}
