//! Clientbound play packet ids.

/// 1.14 (protocol 477).
pub mod newer {
    pub const SPAWN_OBJECT: u32 = 0x00;
    pub const SPAWN_EXPERIENCE_ORB: u32 = 0x01;
    pub const SPAWN_GLOBAL_ENTITY: u32 = 0x02;
    pub const SPAWN_MOB: u32 = 0x03;
    pub const SPAWN_PAINTING: u32 = 0x04;
    pub const SPAWN_PLAYER: u32 = 0x05;
    pub const WINDOW_ITEMS: u32 = 0x14;
    pub const SET_SLOT: u32 = 0x16;
    pub const ENTITY_STATUS: u32 = 0x1B;
    pub const JOIN_GAME: u32 = 0x25;
    pub const ENTITY_POSITION: u32 = 0x28;
    pub const ENTITY_POSITION_AND_ROTATION: u32 = 0x29;
    pub const DESTROY_ENTITIES: u32 = 0x37;
    pub const RESPAWN: u32 = 0x3A;
    pub const ENTITY_METADATA: u32 = 0x43;
    pub const ENTITY_EQUIPMENT: u32 = 0x46;
    pub const ENTITY_SOUND_EFFECT: u32 = 0x50;
    pub const ENTITY_TELEPORT: u32 = 0x56;
}

/// 1.13.2 (protocol 404).
pub mod legacy {
    pub const SPAWN_OBJECT: u32 = 0x00;
    pub const SPAWN_EXPERIENCE_ORB: u32 = 0x01;
    pub const SPAWN_GLOBAL_ENTITY: u32 = 0x02;
    pub const SPAWN_MOB: u32 = 0x03;
    pub const SPAWN_PAINTING: u32 = 0x04;
    pub const SPAWN_PLAYER: u32 = 0x05;
    pub const WINDOW_ITEMS: u32 = 0x15;
    pub const SET_SLOT: u32 = 0x17;
    pub const ENTITY_STATUS: u32 = 0x1C;
    pub const JOIN_GAME: u32 = 0x25;
    pub const ENTITY_RELATIVE_MOVE: u32 = 0x28;
    pub const ENTITY_LOOK_AND_RELATIVE_MOVE: u32 = 0x29;
    pub const USE_BED: u32 = 0x33;
    pub const DESTROY_ENTITIES: u32 = 0x35;
    pub const RESPAWN: u32 = 0x38;
    pub const ENTITY_METADATA: u32 = 0x3F;
    pub const ENTITY_EQUIPMENT: u32 = 0x42;
    pub const SOUND_EFFECT: u32 = 0x4D;
    pub const ENTITY_TELEPORT: u32 = 0x50;
}
