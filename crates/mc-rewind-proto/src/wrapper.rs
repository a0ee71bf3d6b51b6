//! Field-level access to one packet being rewritten.
//!
//! A [`PacketWrapper`] holds the undecoded remainder of the incoming body and
//! the list of fields queued for output. Handlers consume fields from the
//! input (`read`), copy them through (`passthrough`), convert them (`map`)
//! or add new ones (`write`). Whatever input is left when the wrapper is
//! finished is appended verbatim after the output fields.

use bytes::{Bytes, BytesMut};

use crate::error::ProtoError;
use crate::field::{FieldType, FieldValue};
use crate::item::Item;
use crate::metadata::Metadata;
use crate::schema::Schema;
use crate::types::Uuid;

/// A framed packet body: id plus payload, no length prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: u32,
    pub payload: Bytes,
}

impl Packet {
    pub fn new(id: u32, payload: impl Into<Bytes>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }
}

/// Everything one incoming packet turned into, in emission order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WrapperOutput {
    pub before: Vec<Packet>,
    /// `None` when the packet was cancelled.
    pub primary: Option<Packet>,
    pub after: Vec<Packet>,
}

impl WrapperOutput {
    /// Flatten into emission order.
    pub fn into_packets(self) -> Vec<Packet> {
        let mut packets = self.before;
        packets.extend(self.primary);
        packets.extend(self.after);
        packets
    }
}

#[derive(Debug)]
pub struct PacketWrapper {
    id: u32,
    input: Bytes,
    output: Vec<FieldValue>,
    cancelled: bool,
    before: Vec<Packet>,
    after: Vec<Packet>,
}

impl PacketWrapper {
    pub fn new(packet: Packet) -> Self {
        Self {
            id: packet.id,
            input: packet.payload,
            output: Vec::new(),
            cancelled: false,
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// A wrapper with no input, for building a packet from scratch.
    pub fn create(id: u32) -> Self {
        Self::new(Packet::new(id, Bytes::new()))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    /// Undecoded input bytes left.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    /// Consume one field from the input without queueing it for output.
    pub fn read(&mut self, field_type: FieldType) -> Result<FieldValue, ProtoError> {
        FieldValue::decode(field_type, &mut self.input)
    }

    /// Queue a field for output.
    pub fn write(&mut self, value: FieldValue) {
        self.output.push(value);
    }

    /// Read a field and queue it unchanged; returns the value read.
    pub fn passthrough(&mut self, field_type: FieldType) -> Result<FieldValue, ProtoError> {
        let value = self.read(field_type)?;
        self.output.push(value.clone());
        Ok(value)
    }

    /// Read a field as `from` and queue it converted to `to`.
    pub fn map(&mut self, from: FieldType, to: FieldType) -> Result<FieldValue, ProtoError> {
        let value = self.read(from)?.convert(to)?;
        self.output.push(value.clone());
        Ok(value)
    }

    fn position_of(&self, field_type: FieldType, index: usize) -> Result<usize, ProtoError> {
        self.output
            .iter()
            .enumerate()
            .filter(|(_, v)| v.field_type() == field_type)
            .nth(index)
            .map(|(i, _)| i)
            .ok_or(ProtoError::FieldIndexOutOfRange { field_type, index })
    }

    /// The `index`-th queued output field of `field_type`.
    pub fn get(&self, field_type: FieldType, index: usize) -> Result<&FieldValue, ProtoError> {
        let at = self.position_of(field_type, index)?;
        Ok(&self.output[at])
    }

    pub fn get_mut(
        &mut self,
        field_type: FieldType,
        index: usize,
    ) -> Result<&mut FieldValue, ProtoError> {
        let at = self.position_of(field_type, index)?;
        Ok(&mut self.output[at])
    }

    /// Replace the `index`-th queued output field of `value`'s type.
    pub fn set(&mut self, index: usize, value: FieldValue) -> Result<(), ProtoError> {
        let at = self.position_of(value.field_type(), index)?;
        self.output[at] = value;
        Ok(())
    }

    /// Replace the `index`-th queued field of `field_type` with `value`,
    /// which may be of a different type.
    pub fn replace(
        &mut self,
        field_type: FieldType,
        index: usize,
        value: FieldValue,
    ) -> Result<(), ProtoError> {
        let at = self.position_of(field_type, index)?;
        self.output[at] = value;
        Ok(())
    }

    /// Integer view of a queued integer field.
    pub fn get_int(&self, field_type: FieldType, index: usize) -> Result<i64, ProtoError> {
        let value = self.get(field_type, index)?;
        value.as_int().ok_or(ProtoError::FieldTypeMismatch {
            expected: field_type,
            got: value.field_type(),
        })
    }

    pub fn get_double(&self, index: usize) -> Result<f64, ProtoError> {
        match self.get(FieldType::Double, index)? {
            FieldValue::Double(v) => Ok(*v),
            other => Err(mismatch(FieldType::Double, other)),
        }
    }

    pub fn read_var_int(&mut self) -> Result<i32, ProtoError> {
        match self.read(FieldType::VarInt)? {
            FieldValue::VarInt(v) => Ok(v),
            other => Err(mismatch(FieldType::VarInt, &other)),
        }
    }

    pub fn read_int(&mut self) -> Result<i32, ProtoError> {
        match self.read(FieldType::Int)? {
            FieldValue::Int(v) => Ok(v),
            other => Err(mismatch(FieldType::Int, &other)),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, ProtoError> {
        match self.read(FieldType::UnsignedByte)? {
            FieldValue::UnsignedByte(v) => Ok(v),
            other => Err(mismatch(FieldType::UnsignedByte, &other)),
        }
    }

    pub fn read_float(&mut self) -> Result<f32, ProtoError> {
        match self.read(FieldType::Float)? {
            FieldValue::Float(v) => Ok(v),
            other => Err(mismatch(FieldType::Float, &other)),
        }
    }

    pub fn read_uuid(&mut self) -> Result<Uuid, ProtoError> {
        match self.read(FieldType::Uuid)? {
            FieldValue::Uuid(v) => Ok(v),
            other => Err(mismatch(FieldType::Uuid, &other)),
        }
    }

    pub fn read_metadata(&mut self, schema: Schema) -> Result<Vec<Metadata>, ProtoError> {
        match self.read(FieldType::MetadataList(schema))? {
            FieldValue::MetadataList(_, list) => Ok(list),
            other => Err(mismatch(FieldType::MetadataList(schema), &other)),
        }
    }

    pub fn read_item(&mut self) -> Result<Option<Item>, ProtoError> {
        match self.read(FieldType::Item)? {
            FieldValue::Item(item) => Ok(item),
            other => Err(mismatch(FieldType::Item, &other)),
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Emit `packet` ahead of this one.
    pub fn send_before(&mut self, packet: Packet) {
        self.before.push(packet);
    }

    /// Emit `packet` after this one.
    pub fn send_after(&mut self, packet: Packet) {
        self.after.push(packet);
    }

    /// Encode the queued fields followed by any unread input.
    pub fn into_packet(self) -> Result<Packet, ProtoError> {
        let mut payload = BytesMut::with_capacity(self.input.len() + 16);
        for field in &self.output {
            field.encode(&mut payload)?;
        }
        payload.extend_from_slice(&self.input);
        Ok(Packet::new(self.id, payload.freeze()))
    }

    pub fn finish(mut self) -> Result<WrapperOutput, ProtoError> {
        let before = std::mem::take(&mut self.before);
        let after = std::mem::take(&mut self.after);
        let primary = if self.cancelled {
            None
        } else {
            Some(self.into_packet()?)
        };
        Ok(WrapperOutput {
            before,
            primary,
            after,
        })
    }
}

fn mismatch(expected: FieldType, got: &FieldValue) -> ProtoError {
    ProtoError::FieldTypeMismatch {
        expected,
        got: got.field_type(),
    }
}
