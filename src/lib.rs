//! # Realm Simulation Core
//!
//! Server-side timing for periodic spell auras and waypoint motion for
//! units moving through the world.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      REALM SIM                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  ├── vec3.rs     - Position + orientation, interpolation     │
//! │  └── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │                                                              │
//! │  spell/          - Aura timing                               │
//! │  ├── codes.rs    - Effect and aura kinds                     │
//! │  ├── entry.rs    - Spell records, radii, cast context        │
//! │  ├── effect.rs   - Per-cast effect descriptor                │
//! │  └── periodic.rs - Duration countdown and tick schedule      │
//! │                                                              │
//! │  movement/       - Waypoint motion                           │
//! │  ├── packet.rs   - Monster-move wire format                  │
//! │  ├── spline.rs   - Active trajectory                         │
//! │  └── controller.rs - Dead reckoning, snapping, arrival       │
//! │                                                              │
//! │  world/          - Collaborator seams                        │
//! │  ├── services.rs - Index, broadcast, clocks, terrain, taxi   │
//! │  └── local.rs    - In-memory world                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Threading
//!
//! Nothing here is shared between threads. Each unit's controller and each
//! aura are driven from the world update loop that owns them; the engines
//! only touch the world through the traits in [`world::services`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod config;
pub mod world;
pub mod spell;
pub mod movement;

// Re-export commonly used types
pub use core::vec3::Vector3;
pub use core::rng::DeterministicRng;
pub use config::{AuraConfig, ConfigError, MotionConfig, SimConfig};
pub use world::{LocalWorld, Unit, UnitKind, WorldServices};
pub use spell::{PeriodicTracker, SpellEffect, SpellEntry};
pub use movement::{MotionController, MotionEvent, MovePacket, SplineFlags};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// World update rate (Hz)
pub const TICK_RATE: u32 = 20;

/// Aura period used when a periodic effect declares none (ms)
pub const DEFAULT_AURA_PERIOD_MS: u32 = 5000;

/// Walking speed for random wandering (units/s)
pub const DEFAULT_WALK_SPEED: f32 = 2.5;
