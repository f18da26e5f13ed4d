//! Static Spell Records
//!
//! Per-spell data as the loader hands it over: a fixed array of effect
//! slots indexed by effect position, plus the radius table and the facts
//! about the cast that effect math depends on.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::spell::codes::{AuraType, SpellEffectType};

/// Number of effect slots carried by every spell.
pub const MAX_EFFECT_SLOTS: usize = 3;

/// Spell record errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpellError {
    /// Index is past the fixed slot array.
    #[error("effect index {index} out of range for spell {spell_id}")]
    NoSuchEffect {
        /// Spell that was asked
        spell_id: u32,
        /// Requested slot
        index: usize,
    },

    /// Slot exists but holds no effect.
    #[error("effect slot {index} of spell {spell_id} is empty")]
    EmptySlot {
        /// Spell that was asked
        spell_id: u32,
        /// Requested slot
        index: usize,
    },
}

/// Static fields of a single effect slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSlot {
    /// Effect kind
    pub effect: SpellEffectType,
    /// Sides of the points die (0 = no roll)
    pub die_sides: i32,
    /// Fixed dice bonus used for deterministic estimates
    pub base_dice: i32,
    /// Extra die sides per caster level
    pub dice_per_level: i32,
    /// Points gained per caster level
    pub real_points_per_level: f32,
    /// Flat points
    pub base_points: i32,
    /// Primary implicit target selector
    pub implicit_target_a: u32,
    /// Secondary implicit target selector
    pub implicit_target_b: u32,
    /// Radius table index (0 = none)
    pub radius_index: u32,
    /// Aura kind applied
    pub aura: AuraType,
    /// Aura period in ms as loaded (0 may mean "default")
    pub aura_period: u32,
    /// Amplitude
    pub amplitude: i32,
    /// Number of chained targets
    pub chain_targets: u32,
    /// Item created or consumed
    pub item_type: u32,
    /// Effect-specific misc value
    pub misc_value: i32,
    /// Spell triggered by this effect
    pub trigger_spell: u32,
}

/// Static spell record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpellEntry {
    /// Spell identifier
    pub id: u32,
    /// Effect slots, by effect index
    pub effects: [EffectSlot; MAX_EFFECT_SLOTS],
}

impl SpellEntry {
    /// Look up a populated effect slot.
    pub fn effect_slot(&self, index: usize) -> Result<&EffectSlot, SpellError> {
        let slot = self.effects.get(index).ok_or(SpellError::NoSuchEffect {
            spell_id: self.id,
            index,
        })?;
        if slot.effect == SpellEffectType::NONE {
            return Err(SpellError::EmptySlot {
                spell_id: self.id,
                index,
            });
        }
        Ok(slot)
    }
}

/// Radius table row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpellRadius {
    /// Base radius
    pub radius: f32,
    /// Growth per caster level
    pub radius_per_level: f32,
    /// Upper bound
    pub radius_max: f32,
}

/// Source of radius rows by index.
pub trait RadiusLookup {
    /// Row for `index`, if the table has one.
    fn radius(&self, index: u32) -> Option<SpellRadius>;
}

impl RadiusLookup for BTreeMap<u32, SpellRadius> {
    fn radius(&self, index: u32) -> Option<SpellRadius> {
        self.get(&index).copied()
    }
}

/// Facts about the cast an effect belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CastContext {
    /// Caster level used for per-level scaling
    pub caster_effective_level: u32,
    /// Total computed duration in ms; `None` when the spell has no
    /// duration definition at all.
    pub duration_ms: Option<i64>,
}

impl CastContext {
    /// Cast with a duration definition.
    pub fn timed(caster_effective_level: u32, duration_ms: i64) -> Self {
        Self {
            caster_effective_level,
            duration_ms: Some(duration_ms),
        }
    }

    /// Cast without a duration definition.
    pub fn instant(caster_effective_level: u32) -> Self {
        Self {
            caster_effective_level,
            duration_ms: None,
        }
    }
}
