//! World Location
//!
//! 3D position plus facing, as units are placed on a map.
//! Orientation travels with the location but never takes part in distance
//! math, and is dropped when a location is put on the wire.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Distances below this are treated as "same point".
pub const DIST_EPSILON: f32 = 1.0e-5;

/// A location in world space.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
    /// Z coordinate (height)
    pub z: f32,
    /// Facing in radians
    pub o: f32,
}

impl Vector3 {
    /// Origin with no facing.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0, o: 0.0 };

    /// Create a location without orientation.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, o: 0.0 }
    }

    /// Create a location with orientation.
    #[inline]
    pub const fn with_orientation(x: f32, y: f32, z: f32, o: f32) -> Self {
        Self { x, y, z, o }
    }

    /// Squared 3D distance to another point.
    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// 3D distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Point reached after travelling `offset` units from `self` toward `target`.
    ///
    /// Never overshoots: offsets at or beyond the full distance return
    /// `target`'s coordinates exactly. A zero-length segment also yields
    /// `target`. Orientation is kept from `self`.
    pub fn point_in_between(self, offset: f32, target: Self) -> Self {
        let distance = self.distance(target);
        if distance <= DIST_EPSILON || offset >= distance {
            return Self { o: self.o, ..target.without_orientation() };
        }
        if offset <= 0.0 {
            return self;
        }

        let factor = offset / distance;
        Self {
            x: self.x + factor * (target.x - self.x),
            y: self.y + factor * (target.y - self.y),
            z: self.z + factor * (target.z - self.z),
            o: self.o,
        }
    }

    /// Copy with orientation cleared.
    #[inline]
    pub fn without_orientation(self) -> Self {
        Self { o: 0.0, ..self }
    }

    /// Position components in wire order (no orientation).
    #[inline]
    pub fn xyz(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Rebuild from wire-order components.
    #[inline]
    pub fn from_xyz(xyz: [f32; 3]) -> Self {
        Self::new(xyz[0], xyz[1], xyz[2])
    }

    /// Whether two points share x/y/z exactly (orientation ignored).
    #[inline]
    pub fn same_position(self, other: Self) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl fmt::Debug for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec3({:.3}, {:.3}, {:.3}, o={:.3})", self.x, self.y, self.z, self.o)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

// =============================================================================
// TESTS
// =============================================================================
