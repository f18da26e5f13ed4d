//! Waypoint Motion
//!
//! Path packets, dead reckoning between waypoints and arrival handling.
//!
//! ## Module Structure
//!
//! - `waypoint`: Queued path points with arrival times
//! - `spline`: Active trajectory descriptor and its flags
//! - `packet`: Monster-move payload layout
//! - `events`: What a motion tick did
//! - `controller`: Per-unit path lifecycle

pub mod waypoint;
pub mod spline;
pub mod packet;
pub mod events;
pub mod controller;

// Re-export key types
pub use waypoint::PendingWaypoint;
pub use spline::{MovementSpline, SplineFlags};
pub use packet::{
    compute_path_timing, uptime_stamp, DecodedMove, MoveHeader, MovePacket, PacketError,
    PathHeader, PathTiming, SMSG_MONSTER_MOVE,
};
pub use events::MotionEvent;
pub use controller::{MotionController, MotionState};
