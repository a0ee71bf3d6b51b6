//! Entity catalogues for both schemas and the mapping between them.

pub mod kind;
pub mod legacy;
pub mod mapping;

pub use kind::EntityKind;
pub use legacy::{LegacyKind, ObjectKind};
pub use mapping::{EntityMappings, Replacement};
