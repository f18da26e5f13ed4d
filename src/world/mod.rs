//! World Collaborators
//!
//! The unit record and the service traits through which the engines reach
//! the rest of the server. Nothing here owns world state; the live server
//! supplies its own implementations.
//!
//! - `unit`: Unit identity, location, taxi/flight state
//! - `services`: Spatial, broadcast, clock, terrain, flight, navigation seams
//! - `local`: In-memory implementation for headless runs and tests

pub mod unit;
pub mod services;
pub mod local;

pub use unit::{CellKey, MapId, ObjectGuid, Unit, UnitKind};
pub use services::{
    Broadcaster, FlightControl, ManualClock, MapContext, Navigation, SpatialIndex, SystemClock,
    TerrainQuery, UptimeClock, WallClock, WorldServices,
};
pub use local::LocalWorld;
