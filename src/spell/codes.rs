//! Spell Codes
//!
//! Numeric identifiers from the static spell tables. They stay open
//! newtypes rather than closed enums: the tables carry values this layer
//! never interprets and those must pass through untouched.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Effect kind of a spell effect slot (damage, apply aura, teleport...).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellEffectType(pub u32);

impl SpellEffectType {
    /// Empty slot
    pub const NONE: Self = Self(0);
    /// Instant kill
    pub const INSTAKILL: Self = Self(1);
    /// Direct school damage
    pub const SCHOOL_DAMAGE: Self = Self(2);
    /// Dummy handled by script
    pub const DUMMY: Self = Self(3);
    /// Teleport the target
    pub const TELEPORT_UNITS: Self = Self(5);
    /// Apply an aura
    pub const APPLY_AURA: Self = Self(6);
    /// Direct heal
    pub const HEAL: Self = Self(10);
    /// Apply an aura to the caster's party
    pub const APPLY_AREA_AURA: Self = Self(35);
    /// Persistent area aura (ground effect)
    pub const PERSISTENT_AREA_AURA: Self = Self(27);
}

impl fmt::Debug for SpellEffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpellEffectType({})", self.0)
    }
}

/// Aura kind applied by an effect.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuraType(pub u32);

impl AuraType {
    /// No aura
    pub const NONE: Self = Self(0);
    /// Damage every period
    pub const PERIODIC_DAMAGE: Self = Self(3);
    /// Heal every period
    pub const PERIODIC_HEAL: Self = Self(8);
    /// Movement speed modifier (not periodic)
    pub const MOD_INCREASE_SPEED: Self = Self(31);
    /// Cast a spell every period
    pub const PERIODIC_TRIGGER_SPELL: Self = Self(23);
    /// Restore power every period
    pub const PERIODIC_ENERGIZE: Self = Self(24);
    /// Drain health to the caster every period
    pub const PERIODIC_LEECH: Self = Self(53);
    /// Transfer caster health to the target every period
    pub const PERIODIC_HEALTH_FUNNEL: Self = Self(62);
    /// Transfer caster mana to the target every period
    pub const PERIODIC_MANA_FUNNEL: Self = Self(63);
    /// Drain mana to the caster every period
    pub const PERIODIC_MANA_LEECH: Self = Self(64);
    /// Health regeneration ("per 5 sec")
    pub const MOD_REGEN: Self = Self(84);
    /// Power regeneration ("per 5 sec")
    pub const MOD_POWER_REGEN: Self = Self(85);

    /// Aura kinds that fire on a period.
    pub const PERIODIC: [Self; 10] = [
        Self::PERIODIC_DAMAGE,
        Self::PERIODIC_HEAL,
        Self::PERIODIC_TRIGGER_SPELL,
        Self::PERIODIC_ENERGIZE,
        Self::PERIODIC_LEECH,
        Self::PERIODIC_HEALTH_FUNNEL,
        Self::PERIODIC_MANA_FUNNEL,
        Self::PERIODIC_MANA_LEECH,
        Self::MOD_REGEN,
        Self::MOD_POWER_REGEN,
    ];

    /// Is this one of the periodic aura kinds?
    #[inline]
    pub fn is_periodic(self) -> bool {
        Self::PERIODIC.contains(&self)
    }
}

impl fmt::Debug for AuraType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuraType({})", self.0)
    }
}
