//! The 1.14 → 1.13.2 clientbound protocol.

pub mod entity_packets;
pub mod ids;
pub mod item_packets;
pub mod sound_packets;

use std::sync::Arc;

use mc_rewind_proto::{FieldType, PacketWrapper};

use crate::diagnostics::DiagnosticsSink;
use crate::enchantment::EnchantmentRewriter;
use crate::entity::EntityMappings;
use crate::error::RewriteError;
use crate::metadata::metadata_rewriter_1_14;
use crate::pipeline::{Protocol, Shared, Unregistered};
use crate::remapper::{BlockItemRemapper, TableRemapper};
use crate::tables::MappingTables;

/// Build the protocol that presents a 1.14 server to a 1.13.2 client.
pub fn protocol_1_13_2_to_1_14(
    tables: Arc<MappingTables>,
    enchantments: EnchantmentRewriter,
    diagnostics: Arc<dyn DiagnosticsSink>,
) -> Protocol {
    let remapper: Arc<dyn BlockItemRemapper> = Arc::new(TableRemapper::new(
        Arc::clone(&tables),
        enchantments,
        Arc::clone(&diagnostics),
    ));
    let shared = Shared {
        metadata: metadata_rewriter_1_14(Arc::clone(&remapper)),
        remapper,
        entities: EntityMappings::for_1_14(),
        diagnostics,
        tables,
    };
    let mut protocol = Protocol::new(shared, Unregistered::PassThrough);
    entity_packets::register(&mut protocol);
    item_packets::register(&mut protocol);
    sound_packets::register(&mut protocol);
    protocol
}

/// The entity id written as the first VarInt field.
pub(crate) fn entity_id(wrapper: &PacketWrapper) -> Result<i32, RewriteError> {
    Ok(wrapper.get_int(FieldType::VarInt, 0)? as i32)
}

/// Three consecutive doubles starting at the `first`-th double field.
pub(crate) fn coordinates(
    wrapper: &PacketWrapper,
    first: usize,
) -> Result<(f64, f64, f64), RewriteError> {
    Ok((
        wrapper.get_double(first)?,
        wrapper.get_double(first + 1)?,
        wrapper.get_double(first + 2)?,
    ))
}
