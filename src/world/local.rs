//! In-Memory World
//!
//! A self-contained implementation of every world seam. Used by the
//! headless demo and by the tests; it records what the engines asked of it
//! so callers can inspect broadcasts, teleports and position writes.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::core::vec3::Vector3;
use crate::world::services::{
    Broadcaster, FlightControl, Navigation, SpatialIndex, TerrainQuery, UptimeClock,
};
use crate::world::unit::{CellKey, MapId, ObjectGuid, Unit};

/// Edge length of a grid cell in world units.
pub const DEFAULT_CELL_SIZE: f32 = 533.333_3 / 8.0;

/// A packet handed to the broadcaster.
#[derive(Clone, Debug, PartialEq)]
pub struct Broadcast {
    /// Opcode the payload was sent under
    pub opcode: u16,
    /// Raw payload bytes
    pub payload: Vec<u8>,
    /// Unit whose observers received it
    pub source: ObjectGuid,
    /// Whether the source unit itself was included
    pub include_self: bool,
}

/// A recorded teleport.
#[derive(Clone, Debug, PartialEq)]
pub struct Teleport {
    /// Unit that was moved
    pub guid: ObjectGuid,
    /// Destination map
    pub map_id: MapId,
    /// Destination point
    pub destination: Vector3,
}

/// In-memory world.
#[derive(Debug)]
pub struct LocalWorld {
    /// Seconds since startup reported by the uptime clock
    pub uptime: f64,
    /// Flat ground height for every map (None = no terrain data)
    pub ground_height: Option<f32>,
    /// Grid cell edge length
    pub cell_size: f32,
    /// Cells considered active
    pub active_cells: BTreeSet<CellKey>,
    /// Treat every cell as active
    pub all_cells_active: bool,
    /// Destinations returned by successive random-point queries
    pub random_points: VecDeque<Vector3>,
    /// Last position written through for each unit
    pub positions: BTreeMap<ObjectGuid, Vector3>,
    /// Number of position write-throughs
    pub position_updates: u32,
    /// Everything broadcast so far
    pub broadcasts: Vec<Broadcast>,
    /// Every teleport performed
    pub teleports: Vec<Teleport>,
    /// Number of flight-state re-evaluations
    pub flight_state_updates: u32,
}

impl Default for LocalWorld {
    fn default() -> Self {
        Self {
            uptime: 0.0,
            ground_height: None,
            cell_size: DEFAULT_CELL_SIZE,
            active_cells: BTreeSet::new(),
            all_cells_active: true,
            random_points: VecDeque::new(),
            positions: BTreeMap::new(),
            position_updates: 0,
            broadcasts: Vec::new(),
            teleports: Vec::new(),
            flight_state_updates: 0,
        }
    }
}

impl LocalWorld {
    /// Empty world with every cell active and no terrain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the uptime clock.
    pub fn advance_uptime(&mut self, secs: f64) {
        self.uptime += secs;
    }

    /// Last recorded position of a unit.
    pub fn position_of(&self, guid: ObjectGuid) -> Option<Vector3> {
        self.positions.get(&guid).copied()
    }

    /// Most recent broadcast, if any.
    pub fn last_broadcast(&self) -> Option<&Broadcast> {
        self.broadcasts.last()
    }
}

impl SpatialIndex for LocalWorld {
    fn update_object(&mut self, unit: &mut Unit) {
        unit.current_cell = Some(self.cell_key(unit.map_id, unit.location.x, unit.location.y));
        self.positions.insert(unit.guid, unit.location);
        self.position_updates += 1;
    }
}

impl Broadcaster for LocalWorld {
    fn send_surrounding(&mut self, opcode: u16, payload: &[u8], unit: &Unit, include_self: bool) {
        self.broadcasts.push(Broadcast {
            opcode,
            payload: payload.to_vec(),
            source: unit.guid,
            include_self,
        });
    }
}

impl UptimeClock for LocalWorld {
    fn seconds_since_startup(&self) -> f64 {
        self.uptime
    }
}

impl TerrainQuery for LocalWorld {
    fn height_at(&self, _map_id: MapId, _x: f32, _y: f32) -> Option<f32> {
        self.ground_height
    }
}

impl FlightControl for LocalWorld {
    fn update_flight_state(&mut self, unit: &mut Unit) {
        self.flight_state_updates += 1;
        unit.flying = unit.has_pending_taxi();
    }

    fn teleport(&mut self, unit: &mut Unit, map_id: MapId, destination: Vector3) {
        unit.map_id = map_id;
        unit.set_position(destination);
        unit.current_cell = Some(self.cell_key(map_id, destination.x, destination.y));
        self.positions.insert(unit.guid, unit.location);
        self.teleports.push(Teleport {
            guid: unit.guid,
            map_id,
            destination,
        });
    }
}

impl Navigation for LocalWorld {
    fn random_point_in_radius(&mut self, _map_id: MapId, center: Vector3, _radius: f32) -> Vector3 {
        self.random_points.pop_front().unwrap_or(center)
    }

    fn cell_key(&self, map_id: MapId, x: f32, y: f32) -> CellKey {
        CellKey {
            map_id,
            x: (x / self.cell_size).floor() as i32,
            y: (y / self.cell_size).floor() as i32,
        }
    }

    fn is_active_cell(&self, cell: CellKey) -> bool {
        self.all_cells_active || self.active_cells.contains(&cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_position_writes() {
        let mut world = LocalWorld::new();
        world.cell_size = 10.0;
        let mut unit = Unit::creature(3, 0, Vector3::new(1.0, 2.0, 3.0));
        world.update_object(&mut unit);
        assert_eq!(world.position_of(3), Some(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(world.position_updates, 1);
        assert_eq!(unit.current_cell, Some(CellKey { map_id: 0, x: 0, y: 0 }));

        // Moving across a cell edge updates the cell
        unit.set_position(Vector3::new(-4.0, 25.0, 3.0));
        world.update_object(&mut unit);
        assert_eq!(unit.current_cell, Some(CellKey { map_id: 0, x: -1, y: 2 }));
    }

    #[test]
    fn test_teleport_moves_unit() {
        let mut world = LocalWorld::new();
        let mut unit = Unit::player(4, 0, Vector3::ZERO);
        world.teleport(&mut unit, 1, Vector3::new(100.0, 100.0, 5.0));

        assert_eq!(unit.map_id, 1);
        assert!(unit.location.same_position(Vector3::new(100.0, 100.0, 5.0)));
        assert_eq!(world.teleports.len(), 1);
        assert!(unit.current_cell.is_some());
    }

    #[test]
    fn test_cell_activity() {
        let mut world = LocalWorld::new();
        world.all_cells_active = false;
        world.cell_size = 10.0;

        let cell = world.cell_key(0, 15.0, -5.0);
        assert_eq!(cell, CellKey { map_id: 0, x: 1, y: -1 });
        assert!(!world.is_active_cell(cell));

        world.active_cells.insert(cell);
        assert!(world.is_active_cell(cell));
    }

    #[test]
    fn test_random_points_fall_back_to_center() {
        let mut world = LocalWorld::new();
        world.random_points.push_back(Vector3::new(5.0, 5.0, 0.0));
        let center = Vector3::new(1.0, 1.0, 0.0);

        assert_eq!(world.random_point_in_radius(0, center, 10.0), Vector3::new(5.0, 5.0, 0.0));
        assert_eq!(world.random_point_in_radius(0, center, 10.0), center);
    }
}
