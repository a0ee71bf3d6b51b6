//! Entity-bound sounds, which 1.13.2 only knows as positioned sounds.

use mc_rewind_proto::{FieldValue, PacketWrapper};

use super::ids::{legacy, newer};
use crate::error::RewriteError;
use crate::pipeline::{HandlerContext, PacketRemapper, Protocol};

/// Sound coordinates are sent as fixed-point with three fraction bits.
const SOUND_POSITION_SCALE: f64 = 8.0;

pub fn register(protocol: &mut Protocol) {
    protocol.register(
        newer::ENTITY_SOUND_EFFECT,
        PacketRemapper::new(legacy::SOUND_EFFECT).handler(entity_sound),
    );
}

fn entity_sound(w: &mut PacketWrapper, ctx: &mut HandlerContext<'_>) -> Result<(), RewriteError> {
    w.cancel();

    let sound = w.read_var_int()?;
    let category = w.read_var_int()?;
    let entity = w.read_var_int()?;
    let volume = w.read_float()?;
    let pitch = w.read_float()?;

    let Some(mapped) = ctx.shared.tables.lookup_sound(sound) else {
        ctx.warn(&format!("no 1.13.2 sound for 1.14 sound {sound}"));
        return Ok(());
    };
    let Some(pos) = ctx.conn.position(entity) else {
        ctx.warn(&format!("sound {sound} for entity {entity} without a known position"));
        return Ok(());
    };

    let mut out = PacketWrapper::create(legacy::SOUND_EFFECT);
    out.write(FieldValue::VarInt(mapped));
    out.write(FieldValue::VarInt(category));
    for axis in [pos.x, pos.y, pos.z] {
        out.write(FieldValue::Int((axis * SOUND_POSITION_SCALE) as i32));
    }
    out.write(FieldValue::Float(volume));
    out.write(FieldValue::Float(pitch));
    w.send_before(out.into_packet()?);
    Ok(())
}
