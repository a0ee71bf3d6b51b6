//! Minecraft Java Edition wire types shared by the 1.14 and 1.13.2 play protocols.

pub mod codec;
pub mod error;
pub mod field;
pub mod item;
pub mod metadata;
pub mod schema;
pub mod types;
pub mod wrapper;

pub use error::ProtoError;
pub use field::{FieldType, FieldValue};
pub use item::Item;
pub use metadata::{MetaType, MetaValue, Metadata, Particle, ParticleData, VillagerData};
pub use schema::Schema;
pub use types::{BlockPos, Uuid, VarInt};
pub use wrapper::{Packet, PacketWrapper, WrapperOutput};
