//! Spell Effect Timing
//!
//! Static effect descriptors and the periodic aura engine.
//!
//! ## Module Structure
//!
//! - `codes`: Effect and aura kind identifiers
//! - `entry`: Loaded spell records, radius table, cast context
//! - `effect`: Per-cast effect descriptor (points, radius, aura timer)
//! - `periodic`: Duration countdown and tick schedule

pub mod codes;
pub mod entry;
pub mod effect;
pub mod periodic;

// Re-export key types
pub use codes::{AuraType, SpellEffectType};
pub use entry::{CastContext, EffectSlot, RadiusLookup, SpellEntry, SpellError, SpellRadius};
pub use effect::SpellEffect;
pub use periodic::{AuraTiming, PeriodicTracker, generate_tick_offsets};
