//! The 1.13.2 entity catalogue and its separate "object" id space.
//!
//! 1.13.2 spawns non-living entities through a dedicated packet whose type
//! field is an object id, not the entity registry id.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyKind {
    AreaEffectCloud,
    ArmorStand,
    Arrow,
    Bat,
    Blaze,
    Boat,
    CaveSpider,
    Chicken,
    Cod,
    Cow,
    Creeper,
    Donkey,
    Dolphin,
    DragonFireball,
    Drowned,
    ElderGuardian,
    EndCrystal,
    EnderDragon,
    Enderman,
    Endermite,
    EvokerFangs,
    Evoker,
    ExperienceOrb,
    EyeOfEnder,
    FallingBlock,
    FireworkRocket,
    Ghast,
    Giant,
    Guardian,
    Horse,
    Husk,
    Illusioner,
    Item,
    ItemFrame,
    Fireball,
    LeashKnot,
    Llama,
    LlamaSpit,
    MagmaCube,
    Minecart,
    ChestMinecart,
    CommandBlockMinecart,
    FurnaceMinecart,
    HopperMinecart,
    SpawnerMinecart,
    TntMinecart,
    Mule,
    Mooshroom,
    Ocelot,
    Painting,
    Parrot,
    Pig,
    Pufferfish,
    ZombiePigman,
    PolarBear,
    Tnt,
    Rabbit,
    Salmon,
    Sheep,
    Shulker,
    ShulkerBullet,
    Silverfish,
    Skeleton,
    SkeletonHorse,
    Slime,
    SmallFireball,
    SnowGolem,
    Snowball,
    SpectralArrow,
    Spider,
    Squid,
    Stray,
    TropicalFish,
    Turtle,
    Egg,
    EnderPearl,
    ExperienceBottle,
    Potion,
    Vex,
    Villager,
    IronGolem,
    Vindicator,
    Witch,
    Wither,
    WitherSkeleton,
    WitherSkull,
    Wolf,
    Zombie,
    ZombieHorse,
    ZombieVillager,
    Phantom,
    LightningBolt,
    Player,
    FishingBobber,
    Trident,
}

fn rows() -> &'static [(LegacyKind, &'static str)] {
    use LegacyKind::*;

    static ROWS: [(LegacyKind, &str); 95] = [
        (AreaEffectCloud, "area_effect_cloud"),
        (ArmorStand, "armor_stand"),
        (Arrow, "arrow"),
        (Bat, "bat"),
        (Blaze, "blaze"),
        (Boat, "boat"),
        (CaveSpider, "cave_spider"),
        (Chicken, "chicken"),
        (Cod, "cod"),
        (Cow, "cow"),
        (Creeper, "creeper"),
        (Donkey, "donkey"),
        (Dolphin, "dolphin"),
        (DragonFireball, "dragon_fireball"),
        (Drowned, "drowned"),
        (ElderGuardian, "elder_guardian"),
        (EndCrystal, "end_crystal"),
        (EnderDragon, "ender_dragon"),
        (Enderman, "enderman"),
        (Endermite, "endermite"),
        (EvokerFangs, "evoker_fangs"),
        (Evoker, "evoker"),
        (ExperienceOrb, "experience_orb"),
        (EyeOfEnder, "eye_of_ender"),
        (FallingBlock, "falling_block"),
        (FireworkRocket, "firework_rocket"),
        (Ghast, "ghast"),
        (Giant, "giant"),
        (Guardian, "guardian"),
        (Horse, "horse"),
        (Husk, "husk"),
        (Illusioner, "illusioner"),
        (Item, "item"),
        (ItemFrame, "item_frame"),
        (Fireball, "fireball"),
        (LeashKnot, "leash_knot"),
        (Llama, "llama"),
        (LlamaSpit, "llama_spit"),
        (MagmaCube, "magma_cube"),
        (Minecart, "minecart"),
        (ChestMinecart, "chest_minecart"),
        (CommandBlockMinecart, "command_block_minecart"),
        (FurnaceMinecart, "furnace_minecart"),
        (HopperMinecart, "hopper_minecart"),
        (SpawnerMinecart, "spawner_minecart"),
        (TntMinecart, "tnt_minecart"),
        (Mule, "mule"),
        (Mooshroom, "mooshroom"),
        (Ocelot, "ocelot"),
        (Painting, "painting"),
        (Parrot, "parrot"),
        (Pig, "pig"),
        (Pufferfish, "pufferfish"),
        (ZombiePigman, "zombie_pigman"),
        (PolarBear, "polar_bear"),
        (Tnt, "tnt"),
        (Rabbit, "rabbit"),
        (Salmon, "salmon"),
        (Sheep, "sheep"),
        (Shulker, "shulker"),
        (ShulkerBullet, "shulker_bullet"),
        (Silverfish, "silverfish"),
        (Skeleton, "skeleton"),
        (SkeletonHorse, "skeleton_horse"),
        (Slime, "slime"),
        (SmallFireball, "small_fireball"),
        (SnowGolem, "snow_golem"),
        (Snowball, "snowball"),
        (SpectralArrow, "spectral_arrow"),
        (Spider, "spider"),
        (Squid, "squid"),
        (Stray, "stray"),
        (TropicalFish, "tropical_fish"),
        (Turtle, "turtle"),
        (Egg, "egg"),
        (EnderPearl, "ender_pearl"),
        (ExperienceBottle, "experience_bottle"),
        (Potion, "potion"),
        (Vex, "vex"),
        (Villager, "villager"),
        (IronGolem, "iron_golem"),
        (Vindicator, "vindicator"),
        (Witch, "witch"),
        (Wither, "wither"),
        (WitherSkeleton, "wither_skeleton"),
        (WitherSkull, "wither_skull"),
        (Wolf, "wolf"),
        (Zombie, "zombie"),
        (ZombieHorse, "zombie_horse"),
        (ZombieVillager, "zombie_villager"),
        (Phantom, "phantom"),
        (LightningBolt, "lightning_bolt"),
        (Player, "player"),
        (FishingBobber, "fishing_bobber"),
        (Trident, "trident"),
    ];
    &ROWS
}

impl LegacyKind {
    /// 1.13.2 registry id.
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Self> {
        let index = usize::try_from(id).ok()?;
        rows().get(index).map(|(kind, _)| *kind)
    }

    pub fn name(self) -> &'static str {
        rows()[self as usize].1
    }

    pub fn from_name(name: &str) -> Option<Self> {
        rows()
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(kind, _)| *kind)
    }

    /// Data value of the MINECART object for this kind, if it is a minecart.
    pub fn minecart_data(self) -> Option<i32> {
        match self {
            LegacyKind::Minecart => Some(0),
            LegacyKind::ChestMinecart => Some(1),
            LegacyKind::FurnaceMinecart => Some(2),
            LegacyKind::TntMinecart => Some(3),
            LegacyKind::SpawnerMinecart => Some(4),
            LegacyKind::HopperMinecart => Some(5),
            LegacyKind::CommandBlockMinecart => Some(6),
            _ => None,
        }
    }

    pub fn is_arrow(self) -> bool {
        matches!(
            self,
            LegacyKind::Arrow | LegacyKind::SpectralArrow | LegacyKind::Trident
        )
    }
}

impl fmt::Display for LegacyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Object ids understood by the 1.13.2 spawn-object packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Boat = 1,
    Item = 2,
    AreaEffectCloud = 3,
    Minecart = 10,
    TntPrimed = 50,
    EnderCrystal = 51,
    TippedArrow = 60,
    Snowball = 61,
    Egg = 62,
    Fireball = 63,
    SmallFireball = 64,
    EnderPearl = 65,
    WitherSkull = 66,
    ShulkerBullet = 67,
    LlamaSpit = 68,
    FallingBlock = 70,
    ItemFrame = 71,
    EyeOfEnder = 72,
    Potion = 73,
    XpBottle = 75,
    Firework = 76,
    Leash = 77,
    EvocationFangs = 79,
    FishingHook = 90,
    SpectralArrow = 91,
    DragonFireball = 93,
    Trident = 94,
}

impl ObjectKind {
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Object for a legacy entity kind. Every minecart variant is the one
    /// MINECART object, told apart by the data field.
    pub fn from_legacy(kind: LegacyKind) -> Option<Self> {
        if kind.minecart_data().is_some() {
            return Some(ObjectKind::Minecart);
        }
        let object = match kind {
            LegacyKind::Boat => ObjectKind::Boat,
            LegacyKind::Item => ObjectKind::Item,
            LegacyKind::AreaEffectCloud => ObjectKind::AreaEffectCloud,
            LegacyKind::Tnt => ObjectKind::TntPrimed,
            LegacyKind::EndCrystal => ObjectKind::EnderCrystal,
            LegacyKind::Arrow => ObjectKind::TippedArrow,
            LegacyKind::Snowball => ObjectKind::Snowball,
            LegacyKind::Egg => ObjectKind::Egg,
            LegacyKind::Fireball => ObjectKind::Fireball,
            LegacyKind::SmallFireball => ObjectKind::SmallFireball,
            LegacyKind::EnderPearl => ObjectKind::EnderPearl,
            LegacyKind::WitherSkull => ObjectKind::WitherSkull,
            LegacyKind::ShulkerBullet => ObjectKind::ShulkerBullet,
            LegacyKind::LlamaSpit => ObjectKind::LlamaSpit,
            LegacyKind::FallingBlock => ObjectKind::FallingBlock,
            LegacyKind::ItemFrame => ObjectKind::ItemFrame,
            LegacyKind::EyeOfEnder => ObjectKind::EyeOfEnder,
            LegacyKind::Potion => ObjectKind::Potion,
            LegacyKind::ExperienceBottle => ObjectKind::XpBottle,
            LegacyKind::FireworkRocket => ObjectKind::Firework,
            LegacyKind::LeashKnot => ObjectKind::Leash,
            LegacyKind::EvokerFangs => ObjectKind::EvocationFangs,
            LegacyKind::FishingBobber => ObjectKind::FishingHook,
            LegacyKind::SpectralArrow => ObjectKind::SpectralArrow,
            LegacyKind::DragonFireball => ObjectKind::DragonFireball,
            LegacyKind::Trident => ObjectKind::Trident,
            _ => return None,
        };
        Some(object)
    }
}
