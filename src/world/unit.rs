//! Unit Record
//!
//! The slice of a world unit that motion needs to read and write.
//! Inventory, combat and AI live elsewhere.

use serde::{Serialize, Deserialize};

use crate::core::vec3::Vector3;

/// Globally unique object identifier.
pub type ObjectGuid = u64;

/// Map (continent/instance) identifier.
pub type MapId = u32;

/// Kind of unit, as far as movement cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Player character. Sees its own movement packets and may ride taxis.
    Player,
    /// Server-controlled creature.
    Creature,
}

/// Grid cell key used by the spatial partitioning layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellKey {
    /// Map the cell belongs to
    pub map_id: MapId,
    /// Cell column
    pub x: i32,
    /// Cell row
    pub y: i32,
}

/// A movable unit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Unit {
    /// Object identifier
    pub guid: ObjectGuid,
    /// Player or creature
    pub kind: UnitKind,
    /// Current map
    pub map_id: MapId,
    /// Current location and facing
    pub location: Vector3,
    /// Cell the unit was last registered in
    pub current_cell: Option<CellKey>,
    /// Player is mounted on a flight path
    pub flying: bool,
    /// Final destination of an in-progress taxi flight
    pub pending_taxi_destination: Option<Vector3>,
}

impl Unit {
    /// Create a grounded unit.
    pub fn new(guid: ObjectGuid, kind: UnitKind, map_id: MapId, location: Vector3) -> Self {
        Self {
            guid,
            kind,
            map_id,
            location,
            current_cell: None,
            flying: false,
            pending_taxi_destination: None,
        }
    }

    /// Shorthand for a player unit.
    pub fn player(guid: ObjectGuid, map_id: MapId, location: Vector3) -> Self {
        Self::new(guid, UnitKind::Player, map_id, location)
    }

    /// Shorthand for a creature unit.
    pub fn creature(guid: ObjectGuid, map_id: MapId, location: Vector3) -> Self {
        Self::new(guid, UnitKind::Creature, map_id, location)
    }

    /// Is this a player character?
    #[inline]
    pub fn is_player(&self) -> bool {
        self.kind == UnitKind::Player
    }

    /// Is a taxi flight waiting to deliver this unit?
    #[inline]
    pub fn has_pending_taxi(&self) -> bool {
        self.is_player() && self.pending_taxi_destination.is_some()
    }

    /// Overwrite position, keeping the current facing.
    #[inline]
    pub fn set_position(&mut self, position: Vector3) {
        self.location.x = position.x;
        self.location.y = position.y;
        self.location.z = position.z;
    }
}
