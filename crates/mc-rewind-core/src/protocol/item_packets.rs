//! Inventory and equipment packets carrying item stacks.

use mc_rewind_proto::{FieldType, FieldValue, PacketWrapper};

use super::ids::{legacy, newer};
use crate::error::RewriteError;
use crate::pipeline::{HandlerContext, PacketRemapper, Protocol};

pub fn register(protocol: &mut Protocol) {
    protocol.register(
        newer::WINDOW_ITEMS,
        PacketRemapper::new(legacy::WINDOW_ITEMS)
            .passthrough(FieldType::UnsignedByte) // window id
            .handler(|w, ctx| {
                let FieldValue::ItemArray(items) = w.read(FieldType::ItemArray)? else {
                    return Ok(());
                };
                let remapper = &ctx.shared.remapper;
                let items = items
                    .into_iter()
                    .map(|item| remapper.rewrite_item(item))
                    .collect();
                w.write(FieldValue::ItemArray(items));
                Ok(())
            }),
    );

    protocol.register(
        newer::SET_SLOT,
        PacketRemapper::new(legacy::SET_SLOT)
            .passthrough(FieldType::Byte) // window id
            .passthrough(FieldType::Short) // slot
            .handler(rewrite_item),
    );

    protocol.register(
        newer::ENTITY_EQUIPMENT,
        PacketRemapper::new(legacy::ENTITY_EQUIPMENT)
            .passthrough(FieldType::VarInt) // entity id
            .passthrough(FieldType::VarInt) // slot
            .handler(rewrite_item),
    );
}

fn rewrite_item(w: &mut PacketWrapper, ctx: &mut HandlerContext<'_>) -> Result<(), RewriteError> {
    let item = w.read_item()?;
    w.write(FieldValue::Item(ctx.shared.remapper.rewrite_item(item)));
    Ok(())
}
