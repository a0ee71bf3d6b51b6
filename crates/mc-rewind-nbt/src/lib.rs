//! NBT (Named Binary Tag) for Minecraft Java Edition.
//!
//! Java Edition NBT is big-endian throughout: fixed-width numbers, `u16`
//! string lengths and `i32` array lengths. Item stacks carry an *optional*
//! root, where a single `0` byte (TAG_End) stands for "no tag".

pub mod error;
mod io;
pub mod tag;

pub use error::NbtError;
pub use tag::{NbtCompound, NbtRoot, NbtTag, TagKind};

use bytes::{Buf, BufMut};

/// Read a named root compound.
pub fn read_nbt(buf: &mut impl Buf) -> Result<NbtRoot, NbtError> {
    io::read_root(buf)
}

/// Write a named root compound.
pub fn write_nbt(buf: &mut impl BufMut, root: &NbtRoot) {
    io::write_root(buf, root)
}

/// Read an optional root: a leading TAG_End byte means absent.
pub fn read_optional_nbt(buf: &mut impl Buf) -> Result<Option<NbtRoot>, NbtError> {
    if !buf.has_remaining() {
        return Err(NbtError::UnexpectedEof);
    }
    let id = buf.get_u8();
    match TagKind::from_id(id) {
        Some(TagKind::End) => Ok(None),
        Some(TagKind::Compound) => io::read_root_body(buf).map(Some),
        Some(_) => Err(NbtError::RootNotCompound(id)),
        None => Err(NbtError::UnknownTagType(id)),
    }
}

/// Write an optional root, `None` as a single TAG_End byte.
pub fn write_optional_nbt(buf: &mut impl BufMut, root: Option<&NbtRoot>) {
    match root {
        Some(root) => io::write_root(buf, root),
        None => buf.put_u8(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn roundtrip(root: &NbtRoot) {
        let mut buf = BytesMut::new();
        write_nbt(&mut buf, root);
        let decoded = read_nbt(&mut buf.freeze()).unwrap();
        assert_eq!(decoded, *root);
    }

    #[test]
    fn empty_compound_bytes() {
        let mut buf = BytesMut::new();
        write_nbt(&mut buf, &NbtRoot::empty());
        // TAG_Compound, u16 name length 0, TAG_End
        assert_eq!(&buf[..], &[10, 0, 0, 0]);
    }

    #[test]
    fn big_endian_int() {
        let mut c = NbtCompound::new();
        c.insert("a".into(), NbtTag::Int(1));
        let mut buf = BytesMut::new();
        write_nbt(&mut buf, &NbtRoot::new("", c));
        // 10, 0 0 (root name), 3, 0 1 'a', 0 0 0 1, 0
        assert_eq!(&buf[..], &[10, 0, 0, 3, 0, 1, b'a', 0, 0, 0, 1, 0]);
    }

    #[test]
    fn enchanted_item_tag() {
        let mut ench = NbtCompound::new();
        ench.insert("id".into(), NbtTag::String("minecraft:piercing".into()));
        ench.insert("lvl".into(), NbtTag::Short(3));
        let mut display = NbtCompound::new();
        display.insert(
            "Lore".into(),
            NbtTag::List(vec![NbtTag::String("line".into())]),
        );
        let mut c = NbtCompound::new();
        c.insert(
            "Enchantments".into(),
            NbtTag::List(vec![NbtTag::Compound(ench)]),
        );
        c.insert("display".into(), NbtTag::Compound(display));
        c.insert("HideFlags".into(), NbtTag::Int(1));
        roundtrip(&NbtRoot::new("", c));
    }

    #[test]
    fn arrays_and_wide_numbers() {
        let mut c = NbtCompound::new();
        c.insert("b".into(), NbtTag::ByteArray(vec![1, -2, 3]));
        c.insert("i".into(), NbtTag::IntArray(vec![100, -200]));
        c.insert("l".into(), NbtTag::LongArray(vec![i64::MIN, i64::MAX]));
        c.insert("d".into(), NbtTag::Double(std::f64::consts::PI));
        c.insert("f".into(), NbtTag::Float(-0.5));
        c.insert("empty".into(), NbtTag::List(vec![]));
        roundtrip(&NbtRoot::new("root", c));
    }

    #[test]
    fn optional_absent() {
        let mut buf = BytesMut::new();
        write_optional_nbt(&mut buf, None);
        assert_eq!(&buf[..], &[0]);
        assert_eq!(read_optional_nbt(&mut buf.freeze()).unwrap(), None);
    }

    #[test]
    fn optional_present() {
        let mut c = NbtCompound::new();
        c.insert("Damage".into(), NbtTag::Int(7));
        let root = NbtRoot::new("", c);
        let mut buf = BytesMut::new();
        write_optional_nbt(&mut buf, Some(&root));
        assert_eq!(read_optional_nbt(&mut buf.freeze()).unwrap(), Some(root));
    }

    #[test]
    fn truncated_input() {
        let mut c = NbtCompound::new();
        c.insert("name".into(), NbtTag::String("Steve".into()));
        let mut buf = BytesMut::new();
        write_nbt(&mut buf, &NbtRoot::new("", c));
        let truncated = buf.freeze().slice(..8);
        assert!(matches!(
            read_nbt(&mut truncated.clone()),
            Err(NbtError::UnexpectedEof)
        ));
    }

    #[test]
    fn root_must_be_compound() {
        let data: &[u8] = &[8, 0, 0];
        assert!(matches!(
            read_nbt(&mut &data[..]),
            Err(NbtError::RootNotCompound(8))
        ));
    }

    #[test]
    fn negative_array_length() {
        // root { byte_array "a" with length -1 }
        let data: &[u8] = &[10, 0, 0, 7, 0, 1, b'a', 0xFF, 0xFF, 0xFF, 0xFF];
        assert!(matches!(
            read_nbt(&mut &data[..]),
            Err(NbtError::NegativeLength(-1))
        ));
    }
}
