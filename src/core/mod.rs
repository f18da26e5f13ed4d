//! Core primitives.
//!
//! Geometry and randomness shared by the aura and movement engines.

pub mod vec3;
pub mod rng;

// Re-export core types
pub use vec3::Vector3;
pub use rng::DeterministicRng;
