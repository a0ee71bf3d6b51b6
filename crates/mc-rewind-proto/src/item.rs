//! Item stacks ("slots") in the flattened 1.13+ format.
//!
//! Wire format:
//! ```text
//! bool(present)
//! VarInt(item id)      -- only when present
//! i8(count)
//! NBT root or TAG_End
//! ```

use bytes::{Buf, BufMut};
use mc_rewind_nbt::{read_optional_nbt, write_optional_nbt, NbtRoot};

use crate::codec::{ensure_remaining, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::types::VarInt;

/// A present item stack. An empty slot is `None` at every use site.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i32,
    pub count: i8,
    pub tag: Option<NbtRoot>,
}

impl Item {
    pub fn new(id: i32, count: i8) -> Self {
        Self {
            id,
            count,
            tag: None,
        }
    }
}

/// Read an optional item stack.
pub fn read_item(buf: &mut impl Buf) -> Result<Option<Item>, ProtoError> {
    ensure_remaining(buf, 1)?;
    if buf.get_u8() == 0 {
        return Ok(None);
    }
    let id = VarInt::proto_decode(buf)?.0;
    ensure_remaining(buf, 1)?;
    let count = buf.get_i8();
    let tag = read_optional_nbt(buf)?;
    Ok(Some(Item { id, count, tag }))
}

/// Write an optional item stack.
pub fn write_item(buf: &mut impl BufMut, item: Option<&Item>) {
    match item {
        None => buf.put_u8(0),
        Some(item) => {
            buf.put_u8(1);
            VarInt(item.id).proto_encode(buf);
            buf.put_i8(item.count);
            write_optional_nbt(buf, item.tag.as_ref());
        }
    }
}
