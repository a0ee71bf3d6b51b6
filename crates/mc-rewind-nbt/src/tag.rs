//! In-memory NBT values.

use std::collections::HashMap;

pub type NbtCompound = HashMap<String, NbtTag>;

/// The outermost compound of an NBT document together with its name.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtRoot {
    pub name: String,
    pub compound: NbtCompound,
}

impl NbtRoot {
    pub fn new(name: impl Into<String>, compound: NbtCompound) -> Self {
        Self {
            name: name.into(),
            compound,
        }
    }

    pub fn empty() -> Self {
        Self::new("", NbtCompound::new())
    }
}

/// Wire id of a tag. `End` only appears as a terminator and as the element
/// kind of an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TagKind {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagKind {
    pub fn from_id(id: u8) -> Option<Self> {
        const KINDS: [TagKind; 13] = [
            TagKind::End,
            TagKind::Byte,
            TagKind::Short,
            TagKind::Int,
            TagKind::Long,
            TagKind::Float,
            TagKind::Double,
            TagKind::ByteArray,
            TagKind::String,
            TagKind::List,
            TagKind::Compound,
            TagKind::IntArray,
            TagKind::LongArray,
        ];
        KINDS.get(usize::from(id)).copied()
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NbtTag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<NbtTag>),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl NbtTag {
    pub fn kind(&self) -> TagKind {
        match self {
            NbtTag::Byte(_) => TagKind::Byte,
            NbtTag::Short(_) => TagKind::Short,
            NbtTag::Int(_) => TagKind::Int,
            NbtTag::Long(_) => TagKind::Long,
            NbtTag::Float(_) => TagKind::Float,
            NbtTag::Double(_) => TagKind::Double,
            NbtTag::ByteArray(_) => TagKind::ByteArray,
            NbtTag::String(_) => TagKind::String,
            NbtTag::List(_) => TagKind::List,
            NbtTag::Compound(_) => TagKind::Compound,
            NbtTag::IntArray(_) => TagKind::IntArray,
            NbtTag::LongArray(_) => TagKind::LongArray,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        if let NbtTag::Int(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Integral tags truncated to `i16`. Enchantment levels arrive as any
    /// of the integral kinds depending on who wrote the item.
    pub fn as_i16_lossy(&self) -> Option<i16> {
        self.as_i64_any().map(|v| v as i16)
    }

    pub fn as_i32_lossy(&self) -> Option<i32> {
        self.as_i64_any().map(|v| v as i32)
    }

    fn as_i64_any(&self) -> Option<i64> {
        match *self {
            NbtTag::Byte(v) => Some(v.into()),
            NbtTag::Short(v) => Some(v.into()),
            NbtTag::Int(v) => Some(v.into()),
            NbtTag::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        if let NbtTag::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_compound(&self) -> Option<&NbtCompound> {
        if let NbtTag::Compound(c) = self {
            Some(c)
        } else {
            None
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut NbtCompound> {
        if let NbtTag::Compound(c) = self {
            Some(c)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[NbtTag]> {
        if let NbtTag::List(items) = self {
            Some(items)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_ids_round_trip() {
        for id in 0..=12 {
            assert_eq!(TagKind::from_id(id).map(TagKind::id), Some(id));
        }
        assert_eq!(TagKind::from_id(13), None);
        assert_eq!(NbtTag::List(vec![]).kind(), TagKind::List);
        assert_eq!(NbtTag::LongArray(vec![]).kind().id(), 12);
    }

    #[test]
    fn levels_read_from_any_integral_kind() {
        assert_eq!(NbtTag::Byte(3).as_i16_lossy(), Some(3));
        assert_eq!(NbtTag::Int(70_000).as_i16_lossy(), Some(70_000i32 as i16));
        assert_eq!(NbtTag::Long(-2).as_i32_lossy(), Some(-2));
        assert_eq!(NbtTag::String("1".into()).as_i16_lossy(), None);
    }

    #[test]
    fn typed_views_reject_other_kinds() {
        assert_eq!(NbtTag::Short(1).as_int(), None);
        assert_eq!(NbtTag::String("lore".into()).as_string(), Some("lore"));
        assert!(NbtTag::Int(5).as_compound().is_none());
        assert!(NbtTag::Compound(NbtCompound::new()).as_list().is_none());
    }
}
