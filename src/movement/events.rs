//! Motion Events
//!
//! What a motion tick did, for callers that want to react (AI, scripts,
//! the demo driver). Ticks that only dead-reckon produce no event.

use serde::{Serialize, Deserialize};

use crate::core::vec3::Vector3;

/// Outcome of a motion tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MotionEvent {
    /// The unit was snapped onto a waypoint, which was consumed.
    WaypointReached {
        /// Waypoint id within the path
        id: u32,
        /// Waypoint location
        location: Vector3,
    },

    /// The path ran out of time and the controller reset.
    PathFinished {
        /// A taxi flight delivered the player by teleport
        taxi_arrival: bool,
    },
}
