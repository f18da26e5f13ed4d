//! Movement Packet Wire Format
//!
//! Byte layout of the monster-move payload. All fields little-endian,
//! no padding:
//!
//! ```text
//! ┌──────────────┬──────────────────┬────────────┬──────────┬───────────┐
//! │ guid   (u64) │ origin (3 × f32) │ start (u32)│ rsvd (u8)│ flags(u32)│
//! ├──────────────┴──┬───────────────┴────────────┴──────────┴───────────┤
//! │ total ms  (u32) │ count (u32) │ waypoint 0 (3 × f32) │ waypoint 1 … │
//! └─────────────────┴─────────────┴──────────────────────┴──────────────┘
//! ```
//!
//! Fixed-size parts are serde structs run through bincode's legacy
//! (fixed-int, little-endian) encoding, which emits fields back to back.
//! The waypoint count is written explicitly as a u32 since bincode would
//! prefix a sequence with a u64 length.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::vec3::Vector3;
use crate::movement::spline::SplineFlags;
use crate::world::unit::ObjectGuid;

/// Opcode the payload is sent under.
pub const SMSG_MONSTER_MOVE: u16 = 0x0DD;

/// Encoded size of [`MoveHeader`].
pub const MOVE_HEADER_SIZE: usize = 8 + 12 + 4 + 1 + 4;

/// Encoded size of [`PathHeader`].
pub const PATH_HEADER_SIZE: usize = 4 + 4;

/// Encoded size of one waypoint.
pub const WAYPOINT_SIZE: usize = 12;

/// Packet encoding/decoding errors.
#[derive(Debug, Error)]
pub enum PacketError {
    /// bincode failed.
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// Payload ends before the fixed headers do.
    #[error("payload truncated: need at least {needed} bytes, got {actual}")]
    Truncated {
        /// Minimum length
        needed: usize,
        /// Actual length
        actual: usize,
    },

    /// Waypoint count disagrees with the bytes that follow it.
    #[error("waypoint count {count} does not match {remaining} trailing bytes")]
    CountMismatch {
        /// Declared waypoint count
        count: u32,
        /// Bytes after the path header
        remaining: usize,
    },
}

/// Leading fixed-size block of the payload.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveHeader {
    /// Moving unit
    pub guid: ObjectGuid,
    /// Path origin, no orientation
    pub origin: [f32; 3],
    /// Server uptime in ms when the path started
    pub start_time: u32,
    /// Always zero
    pub reserved: u8,
    /// Spline flags
    pub flags: u32,
}

/// Travel time and waypoint count.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathHeader {
    /// Whole-path travel time in ms
    pub total_time_ms: u32,
    /// Number of waypoints that follow
    pub waypoint_count: u32,
}

/// Arrival times along a path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathTiming {
    /// Cumulative arrival time (seconds) at each waypoint
    pub arrivals: Vec<f32>,
}

impl PathTiming {
    /// Time to reach the last waypoint, in seconds.
    pub fn total_time(&self) -> f32 {
        self.arrivals.last().copied().unwrap_or(0.0)
    }
}

/// Walk the path from `start` at `speed`, accumulating arrival times.
///
/// `speed` must be positive.
pub fn compute_path_timing(start: Vector3, waypoints: &[Vector3], speed: f32) -> PathTiming {
    let mut arrivals = Vec::with_capacity(waypoints.len());
    let mut last = start;
    let mut total_time = 0.0f32;

    for &waypoint in waypoints {
        total_time += last.distance(waypoint) / speed;
        arrivals.push(total_time);
        last = waypoint;
    }

    PathTiming { arrivals }
}

/// Uptime in seconds as the packet's millisecond start stamp.
///
/// Wraps after ~49.7 days of uptime, like the client's own tick counter.
#[inline]
pub fn uptime_stamp(seconds_since_startup: f64) -> u32 {
    (seconds_since_startup * 1000.0) as u64 as u32
}

/// A movement payload ready for the broadcaster.
#[derive(Clone, Debug, PartialEq)]
pub struct MovePacket {
    /// Opcode to frame the payload with
    pub opcode: u16,
    /// Encoded payload
    pub payload: Vec<u8>,
}

impl MovePacket {
    /// Encode a payload.
    pub fn encode(
        header: &MoveHeader,
        total_time_ms: u32,
        waypoints: &[Vector3],
    ) -> Result<Self, PacketError> {
        let path = PathHeader {
            total_time_ms,
            waypoint_count: waypoints.len() as u32,
        };

        let mut payload =
            Vec::with_capacity(MOVE_HEADER_SIZE + PATH_HEADER_SIZE + waypoints.len() * WAYPOINT_SIZE);
        bincode::serialize_into(&mut payload, header)?;
        bincode::serialize_into(&mut payload, &path)?;
        for waypoint in waypoints {
            bincode::serialize_into(&mut payload, &waypoint.xyz())?;
        }

        Ok(Self {
            opcode: SMSG_MONSTER_MOVE,
            payload,
        })
    }

    /// Parse the payload back into its parts.
    pub fn decode(&self) -> Result<DecodedMove, PacketError> {
        DecodedMove::from_bytes(&self.payload)
    }

    /// Payload as lowercase hex, for logs.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.payload)
    }
}

/// A parsed movement payload.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedMove {
    /// Fixed header
    pub header: MoveHeader,
    /// Path header
    pub path: PathHeader,
    /// Waypoints, no orientation
    pub waypoints: Vec<Vector3>,
}

impl DecodedMove {
    /// Parse a raw payload.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PacketError> {
        let needed = MOVE_HEADER_SIZE + PATH_HEADER_SIZE;
        if data.len() < needed {
            return Err(PacketError::Truncated {
                needed,
                actual: data.len(),
            });
        }

        let mut cursor = data;
        let header: MoveHeader = bincode::deserialize_from(&mut cursor)?;
        let path: PathHeader = bincode::deserialize_from(&mut cursor)?;

        if cursor.len() != path.waypoint_count as usize * WAYPOINT_SIZE {
            return Err(PacketError::CountMismatch {
                count: path.waypoint_count,
                remaining: cursor.len(),
            });
        }

        let mut waypoints = Vec::with_capacity(path.waypoint_count as usize);
        for _ in 0..path.waypoint_count {
            let xyz: [f32; 3] = bincode::deserialize_from(&mut cursor)?;
            waypoints.push(Vector3::from_xyz(xyz));
        }

        Ok(Self {
            header,
            path,
            waypoints,
        })
    }

    /// Spline flags carried by the header.
    pub fn flags(&self) -> SplineFlags {
        SplineFlags(self.header.flags)
    }
}

// =============================================================================
// TESTS
// =============================================================================
