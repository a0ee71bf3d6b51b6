//! The 1.14 entity catalogue.
//!
//! Concrete kinds carry their registry id; abstract kinds exist only as
//! parents so rules can target a whole family ("every arrow", "every
//! zombie"). Ancestry is answered from a bit set per kind built once on
//! first use.

use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    // Concrete kinds, in registry id order.
    AreaEffectCloud,
    ArmorStand,
    Arrow,
    Bat,
    Blaze,
    Boat,
    Cat,
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
    Fox,
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
    Panda,
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
    TraderLlama,
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
    Pillager,
    WanderingTrader,
    Witch,
    Wither,
    WitherSkeleton,
    WitherSkull,
    Wolf,
    Zombie,
    ZombieHorse,
    ZombieVillager,
    Phantom,
    Ravager,
    LightningBolt,
    Player,
    FishingBobber,
    Trident,
    // Abstract kinds: parents only, never spawned.
    Entity,
    LivingEntity,
    AbstractInsentient,
    AbstractCreature,
    AbstractAgeable,
    AbstractAnimal,
    AbstractTameableAnimal,
    AbstractVillager,
    AbstractHorse,
    ChestedHorse,
    AbstractGolem,
    AbstractWaterMob,
    AbstractFishes,
    AbstractMonster,
    AbstractRaider,
    AbstractIllagerBase,
    SpellcasterIllager,
    AbstractSkeleton,
    AbstractFlying,
    AbstractAmbient,
    AbstractHanging,
    AbstractArrow,
    AbstractFireball,
    AbstractThrowable,
    AbstractMinecart,
}

struct KindRow {
    kind: EntityKind,
    id: Option<i32>,
    parent: Option<EntityKind>,
    name: &'static str,
}

const fn concrete(id: i32, kind: EntityKind, parent: EntityKind, name: &'static str) -> KindRow {
    KindRow {
        kind,
        id: Some(id),
        parent: Some(parent),
        name,
    }
}

const fn abstract_kind(
    kind: EntityKind,
    parent: Option<EntityKind>,
    name: &'static str,
) -> KindRow {
    KindRow {
        kind,
        id: None,
        parent,
        name,
    }
}

const KIND_COUNT: usize = 127;

/// One row per variant, in declaration order.
fn rows() -> &'static [KindRow] {
    use EntityKind::*;

    static KINDS: [KindRow; KIND_COUNT] = [
        concrete(0, AreaEffectCloud, Entity, "area_effect_cloud"),
        concrete(1, ArmorStand, LivingEntity, "armor_stand"),
        concrete(2, Arrow, AbstractArrow, "arrow"),
        concrete(3, Bat, AbstractAmbient, "bat"),
        concrete(4, Blaze, AbstractMonster, "blaze"),
        concrete(5, Boat, Entity, "boat"),
        concrete(6, Cat, AbstractTameableAnimal, "cat"),
        concrete(7, CaveSpider, Spider, "cave_spider"),
        concrete(8, Chicken, AbstractAnimal, "chicken"),
        concrete(9, Cod, AbstractFishes, "cod"),
        concrete(10, Cow, AbstractAnimal, "cow"),
        concrete(11, Creeper, AbstractMonster, "creeper"),
        concrete(12, Donkey, ChestedHorse, "donkey"),
        concrete(13, Dolphin, AbstractWaterMob, "dolphin"),
        concrete(14, DragonFireball, AbstractFireball, "dragon_fireball"),
        concrete(15, Drowned, Zombie, "drowned"),
        concrete(16, ElderGuardian, Guardian, "elder_guardian"),
        concrete(17, EndCrystal, Entity, "end_crystal"),
        concrete(18, EnderDragon, AbstractInsentient, "ender_dragon"),
        concrete(19, Enderman, AbstractMonster, "enderman"),
        concrete(20, Endermite, AbstractMonster, "endermite"),
        concrete(21, EvokerFangs, Entity, "evoker_fangs"),
        concrete(22, Evoker, SpellcasterIllager, "evoker"),
        concrete(23, ExperienceOrb, Entity, "experience_orb"),
        concrete(24, EyeOfEnder, Entity, "eye_of_ender"),
        concrete(25, FallingBlock, Entity, "falling_block"),
        concrete(26, FireworkRocket, Entity, "firework_rocket"),
        concrete(27, Fox, AbstractAnimal, "fox"),
        concrete(28, Ghast, AbstractFlying, "ghast"),
        concrete(29, Giant, AbstractMonster, "giant"),
        concrete(30, Guardian, AbstractMonster, "guardian"),
        concrete(31, Horse, AbstractHorse, "horse"),
        concrete(32, Husk, Zombie, "husk"),
        concrete(33, Illusioner, SpellcasterIllager, "illusioner"),
        concrete(34, Item, Entity, "item"),
        concrete(35, ItemFrame, AbstractHanging, "item_frame"),
        concrete(36, Fireball, AbstractFireball, "fireball"),
        concrete(37, LeashKnot, AbstractHanging, "leash_knot"),
        concrete(38, Llama, ChestedHorse, "llama"),
        concrete(39, LlamaSpit, Entity, "llama_spit"),
        concrete(40, MagmaCube, Slime, "magma_cube"),
        concrete(41, Minecart, AbstractMinecart, "minecart"),
        concrete(42, ChestMinecart, AbstractMinecart, "chest_minecart"),
        concrete(43, CommandBlockMinecart, AbstractMinecart, "command_block_minecart"),
        concrete(44, FurnaceMinecart, AbstractMinecart, "furnace_minecart"),
        concrete(45, HopperMinecart, AbstractMinecart, "hopper_minecart"),
        concrete(46, SpawnerMinecart, AbstractMinecart, "spawner_minecart"),
        concrete(47, TntMinecart, AbstractMinecart, "tnt_minecart"),
        concrete(48, Mule, ChestedHorse, "mule"),
        concrete(49, Mooshroom, Cow, "mooshroom"),
        concrete(50, Ocelot, AbstractAnimal, "ocelot"),
        concrete(51, Painting, AbstractHanging, "painting"),
        concrete(52, Panda, AbstractAnimal, "panda"),
        concrete(53, Parrot, AbstractTameableAnimal, "parrot"),
        concrete(54, Pig, AbstractAnimal, "pig"),
        concrete(55, Pufferfish, AbstractFishes, "pufferfish"),
        concrete(56, ZombiePigman, Zombie, "zombie_pigman"),
        concrete(57, PolarBear, AbstractAnimal, "polar_bear"),
        concrete(58, Tnt, Entity, "tnt"),
        concrete(59, Rabbit, AbstractAnimal, "rabbit"),
        concrete(60, Salmon, AbstractFishes, "salmon"),
        concrete(61, Sheep, AbstractAnimal, "sheep"),
        concrete(62, Shulker, AbstractGolem, "shulker"),
        concrete(63, ShulkerBullet, Entity, "shulker_bullet"),
        concrete(64, Silverfish, AbstractMonster, "silverfish"),
        concrete(65, Skeleton, AbstractSkeleton, "skeleton"),
        concrete(66, SkeletonHorse, AbstractHorse, "skeleton_horse"),
        concrete(67, Slime, AbstractInsentient, "slime"),
        concrete(68, SmallFireball, AbstractFireball, "small_fireball"),
        concrete(69, SnowGolem, AbstractGolem, "snow_golem"),
        concrete(70, Snowball, AbstractThrowable, "snowball"),
        concrete(71, SpectralArrow, AbstractArrow, "spectral_arrow"),
        concrete(72, Spider, AbstractMonster, "spider"),
        concrete(73, Squid, AbstractWaterMob, "squid"),
        concrete(74, Stray, AbstractSkeleton, "stray"),
        concrete(75, TraderLlama, Llama, "trader_llama"),
        concrete(76, TropicalFish, AbstractFishes, "tropical_fish"),
        concrete(77, Turtle, AbstractAnimal, "turtle"),
        concrete(78, Egg, AbstractThrowable, "egg"),
        concrete(79, EnderPearl, AbstractThrowable, "ender_pearl"),
        concrete(80, ExperienceBottle, AbstractThrowable, "experience_bottle"),
        concrete(81, Potion, AbstractThrowable, "potion"),
        concrete(82, Vex, AbstractMonster, "vex"),
        concrete(83, Villager, AbstractVillager, "villager"),
        concrete(84, IronGolem, AbstractGolem, "iron_golem"),
        concrete(85, Vindicator, AbstractIllagerBase, "vindicator"),
        concrete(86, Pillager, AbstractIllagerBase, "pillager"),
        concrete(87, WanderingTrader, AbstractVillager, "wandering_trader"),
        concrete(88, Witch, AbstractRaider, "witch"),
        concrete(89, Wither, AbstractMonster, "wither"),
        concrete(90, WitherSkeleton, AbstractSkeleton, "wither_skeleton"),
        concrete(91, WitherSkull, AbstractFireball, "wither_skull"),
        concrete(92, Wolf, AbstractTameableAnimal, "wolf"),
        concrete(93, Zombie, AbstractMonster, "zombie"),
        concrete(94, ZombieHorse, AbstractHorse, "zombie_horse"),
        concrete(95, ZombieVillager, Zombie, "zombie_villager"),
        concrete(96, Phantom, AbstractFlying, "phantom"),
        concrete(97, Ravager, AbstractRaider, "ravager"),
        concrete(98, LightningBolt, Entity, "lightning_bolt"),
        concrete(99, Player, LivingEntity, "player"),
        concrete(100, FishingBobber, Entity, "fishing_bobber"),
        concrete(101, Trident, AbstractArrow, "trident"),
        abstract_kind(Entity, None, "entity"),
        abstract_kind(LivingEntity, Some(Entity), "living_entity"),
        abstract_kind(AbstractInsentient, Some(LivingEntity), "abstract_insentient"),
        abstract_kind(AbstractCreature, Some(AbstractInsentient), "abstract_creature"),
        abstract_kind(AbstractAgeable, Some(AbstractCreature), "abstract_ageable"),
        abstract_kind(AbstractAnimal, Some(AbstractAgeable), "abstract_animal"),
        abstract_kind(
            AbstractTameableAnimal,
            Some(AbstractAnimal),
            "abstract_tameable_animal",
        ),
        abstract_kind(AbstractVillager, Some(AbstractAgeable), "abstract_villager"),
        abstract_kind(AbstractHorse, Some(AbstractAnimal), "abstract_horse"),
        abstract_kind(ChestedHorse, Some(AbstractHorse), "chested_horse"),
        abstract_kind(AbstractGolem, Some(AbstractCreature), "abstract_golem"),
        abstract_kind(AbstractWaterMob, Some(AbstractCreature), "abstract_water_mob"),
        abstract_kind(AbstractFishes, Some(AbstractWaterMob), "abstract_fishes"),
        abstract_kind(AbstractMonster, Some(AbstractCreature), "abstract_monster"),
        abstract_kind(AbstractRaider, Some(AbstractMonster), "abstract_raider"),
        abstract_kind(AbstractIllagerBase, Some(AbstractRaider), "abstract_illager_base"),
        abstract_kind(SpellcasterIllager, Some(AbstractIllagerBase), "spellcaster_illager"),
        abstract_kind(AbstractSkeleton, Some(AbstractMonster), "abstract_skeleton"),
        abstract_kind(AbstractFlying, Some(AbstractInsentient), "abstract_flying"),
        abstract_kind(AbstractAmbient, Some(AbstractInsentient), "abstract_ambient"),
        abstract_kind(AbstractHanging, Some(Entity), "abstract_hanging"),
        abstract_kind(AbstractArrow, Some(Entity), "abstract_arrow"),
        abstract_kind(AbstractFireball, Some(Entity), "abstract_fireball"),
        abstract_kind(AbstractThrowable, Some(Entity), "abstract_throwable"),
        abstract_kind(AbstractMinecart, Some(Entity), "abstract_minecart"),
    ];

    &KINDS
}

const _: () = assert!(KIND_COUNT <= u128::BITS as usize);

fn ancestors() -> &'static [u128] {
    static ANCESTORS: OnceLock<Vec<u128>> = OnceLock::new();
    ANCESTORS.get_or_init(|| {
        rows()
            .iter()
            .map(|row| {
                let mut bits = 0u128;
                let mut current = Some(row.kind);
                while let Some(kind) = current {
                    bits |= 1u128 << kind.ordinal();
                    current = rows()[kind.ordinal()].parent;
                }
                bits
            })
            .collect()
    })
}

impl EntityKind {
    fn ordinal(self) -> usize {
        self as usize
    }

    fn row(self) -> &'static KindRow {
        &rows()[self.ordinal()]
    }

    /// Kind for a 1.14 registry id. Abstract kinds have no id.
    pub fn from_id(id: i32) -> Option<Self> {
        let index = usize::try_from(id).ok()?;
        rows()
            .get(index)
            .filter(|row| row.id == Some(id))
            .map(|row| row.kind)
    }

    pub fn id(self) -> Option<i32> {
        self.row().id
    }

    pub fn parent(self) -> Option<EntityKind> {
        self.row().parent
    }

    /// Registry name without namespace, e.g. `zombie_villager`.
    pub fn name(self) -> &'static str {
        self.row().name
    }

    pub fn is_abstract(self) -> bool {
        self.row().id.is_none()
    }

    /// True when `self` is `ancestor` or descends from it.
    pub fn is_or_has_parent(self, ancestor: EntityKind) -> bool {
        ancestors()[self.ordinal()] & (1u128 << ancestor.ordinal()) != 0
    }

    /// Every concrete (spawnable) kind, by registry id.
    pub fn concrete_kinds() -> impl Iterator<Item = EntityKind> {
        rows().iter().filter(|row| row.id.is_some()).map(|row| row.kind)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_declaration_order() {
        for (i, row) in rows().iter().enumerate() {
            assert_eq!(row.kind.ordinal(), i, "{} is out of place", row.name);
        }
    }

    #[test]
    fn ids_are_contiguous() {
        let ids: Vec<i32> = EntityKind::concrete_kinds().filter_map(EntityKind::id).collect();
        assert_eq!(ids, (0..=101).collect::<Vec<_>>());
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(EntityKind::from_id(6), Some(EntityKind::Cat));
        assert_eq!(EntityKind::from_id(99), Some(EntityKind::Player));
        assert_eq!(EntityKind::from_id(102), None);
        assert_eq!(EntityKind::from_id(-1), None);
        assert_eq!(EntityKind::Trident.id(), Some(101));
        assert_eq!(EntityKind::AbstractArrow.id(), None);
    }

    #[test]
    fn every_kind_reaches_the_root() {
        for row in rows() {
            assert!(row.kind.is_or_has_parent(EntityKind::Entity), "{}", row.name);
        }
    }

    #[test]
    fn family_membership() {
        use EntityKind::*;
        assert!(Husk.is_or_has_parent(Zombie));
        assert!(ZombieVillager.is_or_has_parent(Zombie));
        assert!(!Zombie.is_or_has_parent(Husk));
        assert!(Pillager.is_or_has_parent(AbstractIllagerBase));
        assert!(Evoker.is_or_has_parent(AbstractRaider));
        assert!(Ravager.is_or_has_parent(AbstractRaider));
        assert!(!Ravager.is_or_has_parent(AbstractIllagerBase));
        assert!(Trident.is_or_has_parent(AbstractArrow));
        assert!(HopperMinecart.is_or_has_parent(AbstractMinecart));
        assert!(Player.is_or_has_parent(LivingEntity));
        assert!(!Boat.is_or_has_parent(LivingEntity));
        assert!(WitherSkeleton.is_or_has_parent(AbstractSkeleton));
    }

    #[test]
    fn display_uses_registry_name() {
        assert_eq!(EntityKind::WanderingTrader.to_string(), "wandering_trader");
    }
}
