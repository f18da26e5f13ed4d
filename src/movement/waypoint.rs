//! Pending Waypoints

use serde::{Serialize, Deserialize};

use crate::core::vec3::Vector3;

/// A point on the active path the unit has not reached yet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingWaypoint {
    /// Position within the path, starting at 0
    pub id: u32,
    /// Seconds from path start at which the unit arrives
    pub expected_timestamp: f32,
    /// Where the unit will be
    pub location: Vector3,
}

impl PendingWaypoint {
    /// Create a waypoint.
    pub const fn new(id: u32, expected_timestamp: f32, location: Vector3) -> Self {
        Self {
            id,
            expected_timestamp,
            location,
        }
    }
}
