//! World Service Seams
//!
//! Everything the timing and motion engines consume from the rest of the
//! server: the spatial index, observer broadcast, clocks, terrain, taxi
//! handling and navigation. Each seam is a trait so the engines can run
//! against the live world or against [`LocalWorld`](super::local::LocalWorld).

use chrono::Utc;

use crate::core::vec3::Vector3;
use crate::world::unit::{CellKey, MapId, Unit};

/// How interpolated points pick their height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapContext {
    /// Snap height to the terrain of this map.
    Terrain(MapId),
    /// Straight-line interpolation, terrain ignored (flight).
    IgnoreTerrain,
}

/// Write-through of unit positions into the world's object tracker.
pub trait SpatialIndex {
    /// Re-register the unit at its current location and record the
    /// cell it now occupies.
    fn update_object(&mut self, unit: &mut Unit);
}

/// Delivery of packets to everyone who can see a unit.
pub trait Broadcaster {
    /// Send `payload` under `opcode` to all observers of `unit`.
    fn send_surrounding(&mut self, opcode: u16, payload: &[u8], unit: &Unit, include_self: bool);
}

/// Monotonic time since the server started.
pub trait UptimeClock {
    /// Seconds since startup.
    fn seconds_since_startup(&self) -> f64;
}

/// Terrain height lookups.
pub trait TerrainQuery {
    /// Ground height at `(x, y)` on a map, if known.
    fn height_at(&self, map_id: MapId, x: f32, y: f32) -> Option<f32>;

    /// Travel `offset` units from `from` toward `to`, then settle the
    /// height according to `context`.
    fn point_in_between(&self, from: Vector3, offset: f32, to: Vector3, context: MapContext) -> Vector3 {
        let point = from.point_in_between(offset, to);
        match context {
            MapContext::IgnoreTerrain => point,
            MapContext::Terrain(map_id) => match self.height_at(map_id, point.x, point.y) {
                Some(z) => Vector3 { z, ..point },
                None => point,
            },
        }
    }
}

/// Taxi and flight-state handling for players.
pub trait FlightControl {
    /// Re-evaluate whether the player should be shown as flying.
    fn update_flight_state(&mut self, unit: &mut Unit);

    /// Move the unit instantly to `destination` on `map_id`.
    fn teleport(&mut self, unit: &mut Unit, map_id: MapId, destination: Vector3);
}

/// Random destinations and grid activity.
pub trait Navigation {
    /// A reachable point within `radius` of `center`.
    fn random_point_in_radius(&mut self, map_id: MapId, center: Vector3, radius: f32) -> Vector3;

    /// Grid cell containing `(x, y)`.
    fn cell_key(&self, map_id: MapId, x: f32, y: f32) -> CellKey;

    /// Whether the grid cell is currently simulated.
    fn is_active_cell(&self, cell: CellKey) -> bool;
}

/// Every seam the motion controller talks to.
pub trait WorldServices:
    SpatialIndex + Broadcaster + UptimeClock + TerrainQuery + FlightControl + Navigation
{
}

impl<T> WorldServices for T where
    T: SpatialIndex + Broadcaster + UptimeClock + TerrainQuery + FlightControl + Navigation
{
}

/// Wall-clock source used to stamp aura updates.
pub trait WallClock {
    /// Current time in seconds.
    fn now_secs(&self) -> f64;
}

/// Wall clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now_secs(&self) -> f64 {
        Utc::now().timestamp_millis() as f64 / 1000.0
    }
}

/// Wall clock that only moves when told to.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ManualClock {
    /// Current reading in seconds
    pub now: f64,
}

impl ManualClock {
    /// Clock reading `now` seconds.
    pub fn at(now: f64) -> Self {
        Self { now }
    }

    /// Move forward by `secs`.
    pub fn advance(&mut self, secs: f64) {
        self.now += secs;
    }
}

impl WallClock for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now
    }
}
