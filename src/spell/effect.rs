//! Spell Effect Descriptor
//!
//! One effect slot of a cast, bound to its caster level, radius row and
//! aura timer. Static fields are copied from the loaded [`EffectSlot`] and
//! never change; only the embedded [`PeriodicTracker`] mutates.

use serde::{Serialize, Deserialize};

use crate::config::AuraConfig;
use crate::core::rng::DeterministicRng;
use crate::spell::codes::{AuraType, SpellEffectType};
use crate::spell::entry::{CastContext, EffectSlot, RadiusLookup, SpellEntry, SpellError, SpellRadius};
use crate::spell::periodic::PeriodicTracker;
use crate::world::services::WallClock;

/// A spell effect instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpellEffect {
    /// Owning spell
    pub spell_id: u32,
    /// Position within the spell's effect slots
    pub effect_index: usize,
    /// Effect kind
    pub effect_type: SpellEffectType,
    /// Sides of the points die
    pub die_sides: i32,
    /// Fixed dice bonus
    pub base_dice: i32,
    /// Extra die sides per level
    pub dice_per_level: i32,
    /// Points per caster level
    pub real_points_per_level: f32,
    /// Flat points
    pub base_points: i32,
    /// Primary implicit target selector
    pub implicit_target_a: u32,
    /// Secondary implicit target selector
    pub implicit_target_b: u32,
    /// Radius table index
    pub radius_index: u32,
    /// Aura kind applied
    pub aura_type: AuraType,
    /// Effective aura period in ms (0 = not periodic)
    pub aura_period: u32,
    /// Amplitude
    pub amplitude: i32,
    /// Chained target count
    pub chain_targets: u32,
    /// Item type
    pub item_type: u32,
    /// Misc value
    pub misc_value: i32,
    /// Triggered spell
    pub trigger_spell_id: u32,
    /// Bound radius row, if the slot references one
    pub radius_entry: Option<SpellRadius>,
    /// The cast this effect belongs to
    pub cast: CastContext,
    /// Aura countdown and tick schedule
    pub aura: PeriodicTracker,
}

impl SpellEffect {
    /// Build the effect at `index` of `entry` for a cast.
    pub fn new(
        entry: &SpellEntry,
        index: usize,
        cast: CastContext,
        radii: &impl RadiusLookup,
        config: &AuraConfig,
    ) -> Result<Self, SpellError> {
        let slot = entry.effect_slot(index)?;
        Ok(Self::from_slot(entry.id, index, slot, cast, radii, config))
    }

    /// Build an effect directly from a slot record.
    ///
    /// Periodic aura kinds loaded with a zero period get the configured
    /// default period; every other aura kind ends up non-periodic.
    pub fn from_slot(
        spell_id: u32,
        index: usize,
        slot: &EffectSlot,
        cast: CastContext,
        radii: &impl RadiusLookup,
        config: &AuraConfig,
    ) -> Self {
        let aura_period = if slot.aura.is_periodic() {
            if slot.aura_period != 0 {
                slot.aura_period
            } else {
                config.default_period_ms
            }
        } else {
            0
        };
        let radius_entry = match slot.radius_index {
            0 => None,
            index => radii.radius(index),
        };

        Self {
            spell_id,
            effect_index: index,
            effect_type: slot.effect,
            die_sides: slot.die_sides,
            base_dice: slot.base_dice,
            dice_per_level: slot.dice_per_level,
            real_points_per_level: slot.real_points_per_level,
            base_points: slot.base_points,
            implicit_target_a: slot.implicit_target_a,
            implicit_target_b: slot.implicit_target_b,
            radius_index: slot.radius_index,
            aura_type: slot.aura,
            aura_period,
            amplitude: slot.amplitude,
            chain_targets: slot.chain_targets,
            item_type: slot.item_type,
            misc_value: slot.misc_value,
            trigger_spell_id: slot.trigger_spell,
            radius_entry,
            cast,
            aura: PeriodicTracker::new(),
        }
    }

    /// Does the aura fire on a period?
    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.aura_period != 0
    }

    /// Arm the aura countdown at the clock's current time.
    pub fn start_aura_duration(&mut self, clock: &impl WallClock, overwrite: bool) -> bool {
        self.aura
            .start_duration(&self.cast, self.aura_period, clock.now_secs(), overwrite)
    }

    /// Count the aura down to `timestamp` (seconds).
    pub fn update_effect_aura(&mut self, timestamp: f64) {
        self.aura.update_duration(timestamp);
    }

    /// Is the next periodic tick due?
    pub fn is_past_next_period(&self) -> bool {
        self.aura.is_past_next_tick()
    }

    /// Drop due periodic ticks. Returns how many fired.
    pub fn remove_old_periodic_effect_ticks(&mut self) -> u32 {
        self.aura.consume_due_ticks()
    }

    /// Rolled effect value.
    ///
    /// `base + floor(points_per_level * level) + roll`, where the roll is
    /// uniform over `[1, die_sides + dice_per_level]` and absent when the
    /// die has no sides.
    pub fn effect_points(&self, rng: &mut DeterministicRng) -> i32 {
        let rolled = if self.die_sides != 0 {
            let top = (self.die_sides + self.dice_per_level) as i64;
            rng.next_int_range(1, top) as i32
        } else {
            0
        };
        self.base_points + self.level_points() + rolled
    }

    /// Deterministic estimate for tooltips: `base_points + base_dice`.
    pub fn simple_points(&self) -> i32 {
        self.base_points + self.base_dice
    }

    /// Effect radius at the caster's level, capped at the row maximum.
    pub fn radius(&self) -> f32 {
        match self.radius_entry {
            Some(row) => {
                let scaled = row.radius + row.radius_per_level * self.cast.caster_effective_level as f32;
                row.radius_max.min(scaled)
            }
            None => 0.0,
        }
    }

    fn level_points(&self) -> i32 {
        (self.real_points_per_level * self.cast.caster_effective_level as f32).floor() as i32
    }
}

// =============================================================================
// TESTS
// =============================================================================
