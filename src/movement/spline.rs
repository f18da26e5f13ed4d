//! Movement Spline
//!
//! The trajectory descriptor for a unit's active path: where it started,
//! where it is going and how far along in time it is.

use std::fmt;
use std::ops::BitOr;
use serde::{Serialize, Deserialize};

use crate::core::vec3::Vector3;
use crate::world::unit::ObjectGuid;

/// Spline motion flags, as the client understands them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplineFlags(pub u32);

impl SplineFlags {
    /// No flags
    pub const NONE: Self = Self(0x0000_0000);
    /// Spline finished
    pub const DONE: Self = Self(0x0000_0001);
    /// Falling
    pub const FALLING: Self = Self(0x0000_0002);
    /// Run instead of walk
    pub const RUNMODE: Self = Self(0x0000_0100);
    /// Taxi flight, terrain ignored
    pub const FLYING: Self = Self(0x0000_0200);
    /// Final facing given as a spot
    pub const SPOT: Self = Self(0x0001_0000);
    /// Final facing given as a target
    pub const TARGET: Self = Self(0x0002_0000);
    /// Final facing given as an angle
    pub const FACING: Self = Self(0x0004_0000);

    /// Raw flag bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Is this a taxi flight? Only a bare FLYING spline counts; FLYING
    /// combined with other motion flags is a regular path.
    #[inline]
    pub const fn is_taxi_flight(self) -> bool {
        self.0 == Self::FLYING.0
    }
}

impl BitOr for SplineFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for SplineFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SplineFlags({:#010x})", self.0)
    }
}

/// Active trajectory of a unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementSpline {
    /// Motion flags
    pub flags: SplineFlags,
    /// Origin of the path
    pub spot: Vector3,
    /// Unit following the path
    pub guid: ObjectGuid,
    /// Facing at path start
    pub facing: f32,
    /// Milliseconds since the path started, never past `total_time_ms`
    pub elapsed_ms: f32,
    /// Full travel time in milliseconds
    pub total_time_ms: u32,
    /// Destinations, in order
    pub points: Vec<Vector3>,
}

impl MovementSpline {
    /// Fresh spline starting at `spot`.
    pub fn new(flags: SplineFlags, spot: Vector3, guid: ObjectGuid, points: Vec<Vector3>) -> Self {
        Self {
            flags,
            spot,
            guid,
            facing: spot.o,
            elapsed_ms: 0.0,
            total_time_ms: 0,
            points,
        }
    }

    /// Advance by `elapsed_secs`, clamped to the total duration.
    pub fn advance(&mut self, elapsed_secs: f32) {
        let total = self.total_time_ms as f32;
        if self.elapsed_ms < total {
            self.elapsed_ms = (self.elapsed_ms + elapsed_secs * 1000.0).min(total);
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let flags = SplineFlags::RUNMODE | SplineFlags::FLYING;
        assert_eq!(flags.bits(), 0x300);
        assert!(SplineFlags::FLYING.is_taxi_flight());
        assert!(!flags.is_taxi_flight());
        assert!(!SplineFlags::RUNMODE.is_taxi_flight());
    }

    #[test]
    fn test_advance_clamps() {
        let mut spline = MovementSpline::new(
            SplineFlags::RUNMODE,
            Vector3::with_orientation(0.0, 0.0, 0.0, 1.0),
            9,
            vec![Vector3::new(4.0, 0.0, 0.0)],
        );
        assert_eq!(spline.facing, 1.0);
        spline.total_time_ms = 2000;

        spline.advance(0.5);
        assert_eq!(spline.elapsed_ms, 500.0);

        spline.advance(5.0);
        assert_eq!(spline.elapsed_ms, 2000.0);
    }

    #[test]
    fn test_zero_length_spline_does_not_advance() {
        let mut spline = MovementSpline::new(SplineFlags::NONE, Vector3::ZERO, 1, Vec::new());
        spline.advance(1.0);
        assert_eq!(spline.elapsed_ms, 0.0);
    }
}
