//! Big-endian NBT encoding.

use bytes::{Buf, BufMut};

use crate::error::NbtError;
use crate::tag::{NbtCompound, NbtRoot, NbtTag, TagKind};

/// Item tags from a well-behaved server stay far below this.
const MAX_DEPTH: usize = 512;

pub(crate) fn read_root(buf: &mut impl Buf) -> Result<NbtRoot, NbtError> {
    let kind = take_u8(buf)?;
    if kind != TagKind::Compound.id() {
        return Err(NbtError::RootNotCompound(kind));
    }
    read_root_body(buf)
}

/// The root's name and entries, after its kind byte was consumed.
pub(crate) fn read_root_body(buf: &mut impl Buf) -> Result<NbtRoot, NbtError> {
    let mut decoder = Decoder { buf, depth: 0 };
    let name = decoder.string()?;
    let compound = decoder.compound()?;
    Ok(NbtRoot { name, compound })
}

fn take_u8(buf: &mut impl Buf) -> Result<u8, NbtError> {
    if buf.has_remaining() {
        Ok(buf.get_u8())
    } else {
        Err(NbtError::UnexpectedEof)
    }
}

struct Decoder<'a, B> {
    buf: &'a mut B,
    depth: usize,
}

impl<B: Buf> Decoder<'_, B> {
    fn need(&self, n: usize) -> Result<(), NbtError> {
        if self.buf.remaining() < n {
            return Err(NbtError::UnexpectedEof);
        }
        Ok(())
    }

    fn length(&mut self) -> Result<usize, NbtError> {
        self.need(4)?;
        let len = self.buf.get_i32();
        usize::try_from(len).map_err(|_| NbtError::NegativeLength(len))
    }

    fn string(&mut self) -> Result<String, NbtError> {
        self.need(2)?;
        let len = usize::from(self.buf.get_u16());
        self.need(len)?;
        let bytes = self.buf.copy_to_bytes(len);
        String::from_utf8(bytes.to_vec()).map_err(|_| NbtError::InvalidUtf8)
    }

    fn enter(&mut self) -> Result<(), NbtError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(NbtError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn compound(&mut self) -> Result<NbtCompound, NbtError> {
        self.enter()?;
        let mut entries = NbtCompound::new();
        loop {
            let id = take_u8(&mut *self.buf)?;
            let kind = TagKind::from_id(id).ok_or(NbtError::UnknownTagType(id))?;
            if kind == TagKind::End {
                break;
            }
            let name = self.string()?;
            let tag = self.payload(kind)?;
            entries.insert(name, tag);
        }
        self.depth -= 1;
        Ok(entries)
    }

    fn list(&mut self) -> Result<Vec<NbtTag>, NbtError> {
        let id = take_u8(&mut *self.buf)?;
        let element = TagKind::from_id(id).ok_or(NbtError::UnknownTagType(id))?;
        let len = self.length()?;
        if element == TagKind::End && len > 0 {
            return Err(NbtError::UnknownTagType(id));
        }
        self.enter()?;
        let mut items = Vec::with_capacity(len.min(self.buf.remaining()));
        for _ in 0..len {
            items.push(self.payload(element)?);
        }
        self.depth -= 1;
        Ok(items)
    }

    fn payload(&mut self, kind: TagKind) -> Result<NbtTag, NbtError> {
        let tag = match kind {
            TagKind::End => return Err(NbtError::UnknownTagType(0)),
            TagKind::Byte => {
                self.need(1)?;
                NbtTag::Byte(self.buf.get_i8())
            }
            TagKind::Short => {
                self.need(2)?;
                NbtTag::Short(self.buf.get_i16())
            }
            TagKind::Int => {
                self.need(4)?;
                NbtTag::Int(self.buf.get_i32())
            }
            TagKind::Long => {
                self.need(8)?;
                NbtTag::Long(self.buf.get_i64())
            }
            TagKind::Float => {
                self.need(4)?;
                NbtTag::Float(self.buf.get_f32())
            }
            TagKind::Double => {
                self.need(8)?;
                NbtTag::Double(self.buf.get_f64())
            }
            TagKind::ByteArray => {
                let len = self.length()?;
                self.need(len)?;
                NbtTag::ByteArray((0..len).map(|_| self.buf.get_i8()).collect())
            }
            TagKind::String => NbtTag::String(self.string()?),
            TagKind::List => NbtTag::List(self.list()?),
            TagKind::Compound => NbtTag::Compound(self.compound()?),
            TagKind::IntArray => {
                let len = self.length()?;
                self.need(len.saturating_mul(4))?;
                NbtTag::IntArray((0..len).map(|_| self.buf.get_i32()).collect())
            }
            TagKind::LongArray => {
                let len = self.length()?;
                self.need(len.saturating_mul(8))?;
                NbtTag::LongArray((0..len).map(|_| self.buf.get_i64()).collect())
            }
        };
        Ok(tag)
    }
}

pub(crate) fn write_root(buf: &mut impl BufMut, root: &NbtRoot) {
    buf.put_u8(TagKind::Compound.id());
    put_string(buf, &root.name);
    put_compound(buf, &root.compound);
}

fn put_string(buf: &mut impl BufMut, s: &str) {
    buf.put_u16(s.len() as u16);
    buf.put_slice(s.as_bytes());
}

fn put_compound(buf: &mut impl BufMut, entries: &NbtCompound) {
    for (name, tag) in entries {
        buf.put_u8(tag.kind().id());
        put_string(buf, name);
        put_payload(buf, tag);
    }
    buf.put_u8(TagKind::End.id());
}

fn put_payload(buf: &mut impl BufMut, tag: &NbtTag) {
    match tag {
        NbtTag::Byte(v) => buf.put_i8(*v),
        NbtTag::Short(v) => buf.put_i16(*v),
        NbtTag::Int(v) => buf.put_i32(*v),
        NbtTag::Long(v) => buf.put_i64(*v),
        NbtTag::Float(v) => buf.put_f32(*v),
        NbtTag::Double(v) => buf.put_f64(*v),
        NbtTag::ByteArray(values) => {
            buf.put_i32(values.len() as i32);
            values.iter().for_each(|&v| buf.put_i8(v));
        }
        NbtTag::String(s) => put_string(buf, s),
        NbtTag::List(items) => {
            let element = items.first().map_or(TagKind::End, NbtTag::kind);
            buf.put_u8(element.id());
            buf.put_i32(items.len() as i32);
            items.iter().for_each(|item| put_payload(buf, item));
        }
        NbtTag::Compound(entries) => put_compound(buf, entries),
        NbtTag::IntArray(values) => {
            buf.put_i32(values.len() as i32);
            values.iter().for_each(|&v| buf.put_i32(v));
        }
        NbtTag::LongArray(values) => {
            buf.put_i32(values.len() as i32);
            values.iter().for_each(|&v| buf.put_i64(v));
        }
    }
}
