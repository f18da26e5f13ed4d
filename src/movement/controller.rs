//! Motion Controller
//!
//! Server-side dead reckoning along a waypoint path.
//!
//! ```text
//!   begin_path ──► [EnRoute] ──(last waypoint snapped)──► [Arriving]
//!       ▲              │                                      │
//!       │           reset()                  path timer > total path time
//!       │              ▼                                      ▼
//!       └─────────── [Idle] ◄──────────────── reset (taxi teleport first)
//! ```
//!
//! Between waypoint arrivals the unit's position is estimated from speed
//! and the time spent on the current leg. Once the path timer passes a
//! waypoint's arrival time the unit is snapped onto it exactly.

use std::collections::VecDeque;

use tracing::{debug, error, warn};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::config::MotionConfig;
use crate::core::vec3::Vector3;
use crate::movement::events::MotionEvent;
use crate::movement::packet::{
    compute_path_timing, uptime_stamp, MoveHeader, MovePacket, PacketError,
};
use crate::movement::spline::{MovementSpline, SplineFlags};
use crate::movement::waypoint::PendingWaypoint;
use crate::world::services::{FlightControl, MapContext, UptimeClock, WorldServices};
use crate::world::unit::{Unit, UnitKind};

/// Where the controller is in its path lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    /// No active path.
    Idle,
    /// Heading for the next pending waypoint.
    EnRoute,
    /// Every waypoint reached; waiting for the path time to run out.
    Arriving,
}

/// Per-unit waypoint motion.
#[derive(Clone, Debug)]
pub struct MotionController {
    kind: UnitKind,
    config: MotionConfig,
    speed: f32,
    should_update_waypoints: bool,
    last_position: Option<Vector3>,
    pending_waypoints: VecDeque<PendingWaypoint>,
    spline: Option<MovementSpline>,
    /// Seconds the whole path takes (plus flight slack)
    total_waypoint_time: f32,
    /// Seconds since the path started
    total_waypoint_timer: f32,
    /// Seconds since the last waypoint snap
    waypoint_timer: f32,
}

impl MotionController {
    /// Idle controller for `unit`.
    pub fn new(unit: &Unit, config: MotionConfig) -> Self {
        Self {
            kind: unit.kind,
            config,
            speed: 0.0,
            should_update_waypoints: false,
            last_position: None,
            pending_waypoints: VecDeque::new(),
            spline: None,
            total_waypoint_time: 0.0,
            total_waypoint_timer: 0.0,
            waypoint_timer: 0.0,
        }
    }

    #[inline]
    fn is_player(&self) -> bool {
        self.kind == UnitKind::Player
    }

    /// Player riding a taxi flight path.
    fn on_taxi_flight(&self) -> bool {
        self.is_player() && self.spline.as_ref().is_some_and(|spline| spline.flags.is_taxi_flight())
    }

    /// Start moving `unit` through `waypoints`.
    ///
    /// Any previous path is dropped. The movement packet goes to everyone
    /// who can see the unit (players also receive their own). Returns
    /// whether a path was armed; an empty path arms nothing and sends
    /// nothing.
    pub fn begin_path<W: WorldServices>(
        &mut self,
        unit: &mut Unit,
        world: &mut W,
        waypoints: &[Vector3],
        speed: f32,
        flags: SplineFlags,
    ) -> bool {
        self.reset(unit, world);
        if speed <= 0.0 {
            warn!(guid = unit.guid, speed, "movement path started with non-positive speed");
        }
        self.speed = speed;

        self.spline = Some(MovementSpline::new(flags, unit.location, unit.guid, waypoints.to_vec()));
        self.last_position = Some(unit.location);

        let packet = match self.try_build_movement_packet(unit, &*world, Some(waypoints), true) {
            Ok(packet) => packet,
            Err(err) => {
                error!(guid = unit.guid, %err, "failed to encode movement packet");
                None
            }
        };

        let Some(packet) = packet else {
            self.spline = None;
            self.last_position = None;
            self.pending_waypoints.clear();
            self.total_waypoint_time = 0.0;
            return false;
        };

        world.send_surrounding(packet.opcode, &packet.payload, unit, self.is_player());
        self.should_update_waypoints = true;

        debug!(
            guid = unit.guid,
            waypoints = waypoints.len(),
            speed,
            flags = flags.bits(),
            total_time = self.total_waypoint_time,
            "movement path started"
        );
        true
    }

    /// Build the movement payload for `waypoints`, or for whatever is still
    /// pending when `waypoints` is `None` or empty.
    ///
    /// Returns `Ok(None)` when there is nothing to send: an empty waypoint
    /// list crashes the client. With `is_initial`, the computed arrival
    /// times are queued as pending waypoints and the path time is cached.
    pub fn try_build_movement_packet(
        &mut self,
        unit: &Unit,
        clock: &impl UptimeClock,
        waypoints: Option<&[Vector3]>,
        is_initial: bool,
    ) -> Result<Option<MovePacket>, PacketError> {
        let points: Vec<Vector3> = match waypoints {
            Some(points) if !points.is_empty() => points.to_vec(),
            _ => self.pending_waypoints.iter().map(|wp| wp.location).collect(),
        };
        if points.is_empty() {
            return Ok(None);
        }

        let flags = self.spline.as_ref().map(|s| s.flags).unwrap_or_default();
        let timing = compute_path_timing(unit.location, &points, self.speed);
        let total_time = timing.total_time();

        if is_initial {
            for (id, (&location, &arrival)) in points.iter().zip(&timing.arrivals).enumerate() {
                self.pending_waypoints
                    .push_back(PendingWaypoint::new(id as u32, arrival, location));
            }

            // Riders should not dismount the instant the last point is reached
            self.total_waypoint_time = if self.on_taxi_flight() {
                total_time + self.config.flight_arrival_slack_secs
            } else {
                total_time
            };
            if let Some(spline) = self.spline.as_mut() {
                spline.total_time_ms = (total_time * 1000.0) as u32;
            }
        }

        let header = MoveHeader {
            guid: unit.guid,
            origin: unit.location.xyz(),
            start_time: uptime_stamp(clock.seconds_since_startup()),
            reserved: 0,
            flags: flags.bits(),
        };
        MovePacket::encode(&header, (total_time * 1000.0) as u32, &points).map(Some)
    }

    /// Advance the active path by `elapsed` seconds.
    pub fn tick<W: WorldServices>(
        &mut self,
        unit: &mut Unit,
        world: &mut W,
        elapsed: f32,
    ) -> Option<MotionEvent> {
        if !self.should_update_waypoints {
            return None;
        }

        self.total_waypoint_timer += elapsed;
        self.waypoint_timer += elapsed;
        if let Some(spline) = self.spline.as_mut() {
            spline.advance(elapsed);
        }

        let Some(&current) = self.pending_waypoints.front() else {
            return self.finish_if_elapsed(unit, world);
        };

        let event = if self.total_waypoint_timer > current.expected_timestamp {
            self.last_position = Some(current.location);
            self.waypoint_timer = 0.0;
            self.pending_waypoints.pop_front();
            unit.set_position(current.location);

            debug!(guid = unit.guid, id = current.id, location = %current.location, "waypoint reached");
            Some(MotionEvent::WaypointReached {
                id: current.id,
                location: current.location,
            })
        } else {
            let guessed_distance = self.speed * self.waypoint_timer;
            // Flight paths ignore terrain height
            let context = if self.on_taxi_flight() {
                MapContext::IgnoreTerrain
            } else {
                MapContext::Terrain(unit.map_id)
            };
            let from = self.last_position.unwrap_or(unit.location);
            let estimate = world.point_in_between(from, guessed_distance, current.location, context);
            unit.set_position(estimate);

            #[cfg(feature = "debug-tracing")]
            trace!(guid = unit.guid, estimate = %estimate, leg_time = self.waypoint_timer, "dead reckoning");
            None
        };

        world.update_object(unit);
        if unit.has_pending_taxi() {
            world.update_flight_state(unit);
        }
        event
    }

    fn finish_if_elapsed<W: WorldServices>(&mut self, unit: &mut Unit, world: &mut W) -> Option<MotionEvent> {
        if self.total_waypoint_timer <= self.total_waypoint_time {
            return None;
        }

        let mut taxi_arrival = false;
        if unit.has_pending_taxi() {
            if let Some(destination) = unit.pending_taxi_destination.take() {
                unit.flying = false;
                let map_id = unit.map_id;
                world.teleport(unit, map_id, destination);
                taxi_arrival = true;
            }
        }
        self.reset(unit, world);

        debug!(guid = unit.guid, taxi_arrival, "movement path finished");
        Some(MotionEvent::PathFinished { taxi_arrival })
    }

    /// Drop the active path and every timer.
    pub fn reset(&mut self, unit: &mut Unit, world: &mut impl FlightControl) {
        self.spline = None;
        self.should_update_waypoints = false;
        self.last_position = None;
        self.total_waypoint_time = 0.0;
        self.total_waypoint_timer = 0.0;
        self.waypoint_timer = 0.0;
        self.pending_waypoints.clear();
        if self.is_player() {
            world.update_flight_state(unit);
        }
    }

    /// Wander to a random point near `start`.
    ///
    /// The move is skipped when the point is too far above or below
    /// `start`, or lies in an inactive cell other than the unit's own.
    /// Returns whether a path was armed.
    pub fn move_random<W: WorldServices>(
        &mut self,
        unit: &mut Unit,
        world: &mut W,
        start: Vector3,
        radius: f32,
        speed: Option<f32>,
    ) -> bool {
        let point = world.random_point_in_radius(unit.map_id, start, radius);
        if (start.z - point.z).abs() > self.config.random_move_max_z_delta {
            return false;
        }

        let cell = world.cell_key(unit.map_id, point.x, point.y);
        if unit.current_cell != Some(cell) && !world.is_active_cell(cell) {
            return false;
        }

        let speed = speed.unwrap_or(self.config.default_walk_speed);
        self.begin_path(unit, world, &[point], speed, SplineFlags::RUNMODE)
    }

    /// Are waypoints still pending?
    #[inline]
    pub fn is_moving(&self) -> bool {
        !self.pending_waypoints.is_empty()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MotionState {
        match (self.should_update_waypoints, self.pending_waypoints.is_empty()) {
            (false, _) => MotionState::Idle,
            (true, false) => MotionState::EnRoute,
            (true, true) => MotionState::Arriving,
        }
    }

    /// Is the controller advancing a path?
    #[inline]
    pub fn is_active(&self) -> bool {
        self.should_update_waypoints
    }

    /// Speed of the current path.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Active trajectory, if any.
    #[inline]
    pub fn spline(&self) -> Option<&MovementSpline> {
        self.spline.as_ref()
    }

    /// Waypoints not yet reached.
    #[inline]
    pub fn pending_waypoints(&self) -> &VecDeque<PendingWaypoint> {
        &self.pending_waypoints
    }

    /// Interpolation basis of the current leg.
    #[inline]
    pub fn last_position(&self) -> Option<Vector3> {
        self.last_position
    }

    /// Seconds the whole path takes.
    #[inline]
    pub fn total_waypoint_time(&self) -> f32 {
        self.total_waypoint_time
    }

    /// Seconds since the path started.
    #[inline]
    pub fn total_waypoint_timer(&self) -> f32 {
        self.total_waypoint_timer
    }

    /// Seconds spent on the current leg.
    #[inline]
    pub fn waypoint_timer(&self) -> f32 {
        self.waypoint_timer
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::packet::{DecodedMove, SMSG_MONSTER_MOVE};
    use crate::world::local::LocalWorld;
    use crate::world::services::Navigation;
    use proptest::prelude::*;

    fn creature_at(location: Vector3) -> (Unit, MotionController) {
        let unit = Unit::creature(0xF130_0000_0000_0001, 0, location);
        let controller = MotionController::new(&unit, MotionConfig::default());
        (unit, controller)
    }

    fn player_at(location: Vector3) -> (Unit, MotionController) {
        let unit = Unit::player(0x0000_0000_0000_0042, 0, location);
        let controller = MotionController::new(&unit, MotionConfig::default());
        (unit, controller)
    }

    #[test]
    fn test_empty_path_never_arms() {
        let mut world = LocalWorld::new();
        let (mut unit, mut controller) = creature_at(Vector3::ZERO);

        assert!(!controller.begin_path(&mut unit, &mut world, &[], 2.0, SplineFlags::RUNMODE));
        assert!(!controller.is_moving());
        assert_eq!(controller.state(), MotionState::Idle);
        assert!(controller.spline().is_none());
        assert!(world.broadcasts.is_empty());

        // Ticking an idle controller does nothing
        assert_eq!(controller.tick(&mut unit, &mut world, 1.0), None);
        assert_eq!(world.position_updates, 0);
    }

    #[test]
    fn test_straight_line_scenario() {
        let mut world = LocalWorld::new();
        let (mut unit, mut controller) = creature_at(Vector3::ZERO);
        let target = Vector3::new(4.0, 0.0, 0.0);

        assert!(controller.begin_path(&mut unit, &mut world, &[target], 2.0, SplineFlags::RUNMODE));
        assert_eq!(controller.total_waypoint_time(), 2.0);
        assert_eq!(controller.state(), MotionState::EnRoute);

        // Halfway, estimated
        assert_eq!(controller.tick(&mut unit, &mut world, 1.0), None);
        assert!((unit.location.x - 2.0).abs() < 1e-5);
        assert_eq!(world.position_of(unit.guid), Some(unit.location));

        // Past arrival, snapped
        let event = controller.tick(&mut unit, &mut world, 1.5);
        assert_eq!(event, Some(MotionEvent::WaypointReached { id: 0, location: target }));
        assert!(unit.location.same_position(target));
        assert!(!controller.is_moving());
        assert_eq!(controller.state(), MotionState::Arriving);

        // Path time is exhausted, controller resets
        let event = controller.tick(&mut unit, &mut world, 0.05);
        assert_eq!(event, Some(MotionEvent::PathFinished { taxi_arrival: false }));
        assert_eq!(controller.state(), MotionState::Idle);
        assert!(controller.spline().is_none());
    }

    #[test]
    fn test_arrival_timestamps_are_cumulative() {
        let mut world = LocalWorld::new();
        let (mut unit, mut controller) = creature_at(Vector3::ZERO);
        let p1 = Vector3::new(3.0, 4.0, 0.0);
        let p2 = Vector3::new(3.0, 4.0, 5.0);

        controller.begin_path(&mut unit, &mut world, &[p1, p2], 5.0, SplineFlags::RUNMODE);

        let arrivals: Vec<f32> = controller.pending_waypoints().iter().map(|wp| wp.expected_timestamp).collect();
        assert_eq!(arrivals, vec![1.0, 2.0]);
        let ids: Vec<u32> = controller.pending_waypoints().iter().map(|wp| wp.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(controller.total_waypoint_time(), 2.0);
        assert_eq!(controller.spline().unwrap().total_time_ms, 2000);
    }

    #[test]
    fn test_broadcast_payload() {
        let mut world = LocalWorld::new();
        world.uptime = 12.5;
        let (mut unit, mut controller) = creature_at(Vector3::with_orientation(1.0, 1.0, 0.0, 2.0));
        let points = [Vector3::new(1.0, 5.0, 0.0), Vector3::new(4.0, 5.0, 0.0)];

        controller.begin_path(&mut unit, &mut world, &points, 2.0, SplineFlags::RUNMODE);

        let broadcast = world.last_broadcast().unwrap();
        assert_eq!(broadcast.opcode, SMSG_MONSTER_MOVE);
        assert_eq!(broadcast.source, unit.guid);
        assert!(!broadcast.include_self);

        let decoded = DecodedMove::from_bytes(&broadcast.payload).unwrap();
        assert_eq!(decoded.header.guid, unit.guid);
        assert_eq!(decoded.header.origin, [1.0, 1.0, 0.0]);
        assert_eq!(decoded.header.start_time, 12500);
        assert_eq!(decoded.header.reserved, 0);
        assert_eq!(decoded.flags(), SplineFlags::RUNMODE);
        // 4 units then 3 units at 2 u/s
        assert_eq!(decoded.path.total_time_ms, 3500);
        assert_eq!(decoded.waypoints, points.to_vec());
    }

    #[test]
    fn test_players_see_their_own_path() {
        let mut world = LocalWorld::new();
        let (mut unit, mut controller) = player_at(Vector3::ZERO);
        controller.begin_path(&mut unit, &mut world, &[Vector3::new(1.0, 0.0, 0.0)], 1.0, SplineFlags::RUNMODE);
        assert!(world.last_broadcast().unwrap().include_self);
    }

    #[test]
    fn test_snap_consumes_one_waypoint_per_tick() {
        let mut world = LocalWorld::new();
        let (mut unit, mut controller) = creature_at(Vector3::ZERO);
        let points = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(3.0, 0.0, 0.0),
        ];
        controller.begin_path(&mut unit, &mut world, &points, 1.0, SplineFlags::RUNMODE);

        // One long frame passes every arrival, but only the head is consumed
        let event = controller.tick(&mut unit, &mut world, 5.0);
        assert!(matches!(event, Some(MotionEvent::WaypointReached { id: 0, .. })));
        assert_eq!(controller.pending_waypoints().len(), 2);
        assert!(unit.location.same_position(points[0]));
        assert_eq!(controller.waypoint_timer(), 0.0);

        controller.tick(&mut unit, &mut world, 0.0);
        assert_eq!(controller.pending_waypoints().len(), 1);
        assert!(unit.location.same_position(points[1]));
    }

    #[test]
    fn test_estimate_uses_terrain_for_ground_paths() {
        let mut world = LocalWorld::new();
        world.ground_height = Some(7.0);
        let (mut unit, mut controller) = creature_at(Vector3::ZERO);
        controller.begin_path(&mut unit, &mut world, &[Vector3::new(10.0, 0.0, 0.0)], 1.0, SplineFlags::RUNMODE);

        controller.tick(&mut unit, &mut world, 2.0);
        assert!((unit.location.x - 2.0).abs() < 1e-5);
        assert_eq!(unit.location.z, 7.0);
    }

    #[test]
    fn test_player_flight_ignores_terrain_and_gets_slack() {
        let mut world = LocalWorld::new();
        world.ground_height = Some(7.0);
        let (mut unit, mut controller) = player_at(Vector3::new(0.0, 0.0, 50.0));
        let destination = Vector3::new(500.0, 0.0, 50.0);
        unit.pending_taxi_destination = Some(destination);

        let points = [Vector3::new(10.0, 0.0, 50.0)];
        controller.begin_path(&mut unit, &mut world, &points, 10.0, SplineFlags::FLYING);
        assert_eq!(controller.total_waypoint_time(), 2.0);
        assert_eq!(controller.spline().unwrap().total_time_ms, 1000);

        controller.tick(&mut unit, &mut world, 0.5);
        assert_eq!(unit.location.z, 50.0);
        assert!((unit.location.x - 5.0).abs() < 1e-5);
        assert!(unit.flying, "flight state is refreshed while a taxi is pending");

        // Snap at the last point, no dismount yet
        controller.tick(&mut unit, &mut world, 0.6);
        assert!(!controller.is_moving());
        assert_eq!(controller.tick(&mut unit, &mut world, 0.5), None);
        assert_eq!(controller.state(), MotionState::Arriving);

        // Slack exhausted: teleported to the taxi destination
        let event = controller.tick(&mut unit, &mut world, 0.5);
        assert_eq!(event, Some(MotionEvent::PathFinished { taxi_arrival: true }));
        assert!(unit.location.same_position(destination));
        assert!(unit.pending_taxi_destination.is_none());
        assert!(!unit.flying);
        assert_eq!(world.teleports.len(), 1);
        assert_eq!(controller.state(), MotionState::Idle);
    }

    #[test]
    fn test_creature_flight_still_follows_terrain() {
        let mut world = LocalWorld::new();
        world.ground_height = Some(3.0);
        let (mut unit, mut controller) = creature_at(Vector3::new(0.0, 0.0, 20.0));
        controller.begin_path(&mut unit, &mut world, &[Vector3::new(10.0, 0.0, 20.0)], 1.0, SplineFlags::FLYING);

        controller.tick(&mut unit, &mut world, 1.0);
        assert_eq!(unit.location.z, 3.0);
    }

    #[test]
    fn test_creature_flight_gets_no_slack() {
        let mut world = LocalWorld::new();
        let (mut unit, mut controller) = creature_at(Vector3::ZERO);
        controller.begin_path(&mut unit, &mut world, &[Vector3::new(10.0, 0.0, 0.0)], 10.0, SplineFlags::FLYING);

        assert_eq!(controller.total_waypoint_time(), 1.0);

        // Snap, then finish as soon as the travel time is up
        controller.tick(&mut unit, &mut world, 1.05);
        let event = controller.tick(&mut unit, &mut world, 0.05);
        assert_eq!(event, Some(MotionEvent::PathFinished { taxi_arrival: false }));
    }

    #[test]
    fn test_mixed_flying_flags_are_a_ground_path() {
        let mut world = LocalWorld::new();
        world.ground_height = Some(7.0);
        let (mut unit, mut controller) = player_at(Vector3::ZERO);
        let flags = SplineFlags::FLYING | SplineFlags::RUNMODE;
        controller.begin_path(&mut unit, &mut world, &[Vector3::new(10.0, 0.0, 0.0)], 10.0, flags);

        assert_eq!(controller.total_waypoint_time(), 1.0);

        controller.tick(&mut unit, &mut world, 0.5);
        assert!((unit.location.x - 5.0).abs() < 1e-5);
        assert_eq!(unit.location.z, 7.0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut world = LocalWorld::new();
        let (mut unit, mut controller) = player_at(Vector3::ZERO);
        controller.begin_path(
            &mut unit,
            &mut world,
            &[Vector3::new(5.0, 0.0, 0.0), Vector3::new(5.0, 5.0, 0.0)],
            1.0,
            SplineFlags::RUNMODE,
        );
        controller.tick(&mut unit, &mut world, 1.0);
        let updates_before = world.flight_state_updates;

        controller.reset(&mut unit, &mut world);

        assert!(!controller.is_moving());
        assert!(!controller.is_active());
        assert_eq!(controller.state(), MotionState::Idle);
        assert!(controller.spline().is_none());
        assert!(controller.last_position().is_none());
        assert_eq!(controller.total_waypoint_time(), 0.0);
        assert_eq!(controller.total_waypoint_timer(), 0.0);
        assert_eq!(controller.waypoint_timer(), 0.0);
        assert_eq!(world.flight_state_updates, updates_before + 1);
    }

    #[test]
    fn test_new_path_replaces_old() {
        let mut world = LocalWorld::new();
        let (mut unit, mut controller) = creature_at(Vector3::ZERO);
        controller.begin_path(&mut unit, &mut world, &[Vector3::new(10.0, 0.0, 0.0)], 1.0, SplineFlags::RUNMODE);
        controller.tick(&mut unit, &mut world, 3.0);

        let turn = Vector3::new(3.0, 4.0, 0.0);
        controller.begin_path(&mut unit, &mut world, &[turn], 1.0, SplineFlags::RUNMODE);

        assert_eq!(controller.pending_waypoints().len(), 1);
        assert_eq!(controller.total_waypoint_timer(), 0.0);
        // Timing starts from where the unit actually is
        let expected = Vector3::new(3.0, 0.0, 0.0).distance(turn);
        assert!((controller.total_waypoint_time() - expected).abs() < 1e-5);
        assert_eq!(controller.spline().unwrap().spot, unit.location);
    }

    #[test]
    fn test_partial_packet_uses_pending_waypoints() {
        let mut world = LocalWorld::new();
        let (mut unit, mut controller) = creature_at(Vector3::ZERO);
        let points = [Vector3::new(2.0, 0.0, 0.0), Vector3::new(2.0, 2.0, 0.0)];
        controller.begin_path(&mut unit, &mut world, &points, 1.0, SplineFlags::RUNMODE);
        controller.tick(&mut unit, &mut world, 2.5);

        let packet = controller
            .try_build_movement_packet(&unit, &world, None, false)
            .unwrap()
            .unwrap();
        let decoded = packet.decode().unwrap();
        assert_eq!(decoded.waypoints, vec![points[1]]);
        assert_eq!(decoded.path.total_time_ms, 2000);
        // Partial packets leave the queue alone
        assert_eq!(controller.pending_waypoints().len(), 1);
    }

    #[test]
    fn test_partial_packet_when_idle_is_none() {
        let world = LocalWorld::new();
        let (unit, mut controller) = creature_at(Vector3::ZERO);
        assert!(controller.try_build_movement_packet(&unit, &world, None, false).unwrap().is_none());
        assert!(controller.try_build_movement_packet(&unit, &world, Some(&[][..]), false).unwrap().is_none());
    }

    #[test]
    fn test_spline_elapsed_is_clamped() {
        let mut world = LocalWorld::new();
        let (mut unit, mut controller) = creature_at(Vector3::ZERO);
        controller.begin_path(&mut unit, &mut world, &[Vector3::new(1.0, 0.0, 0.0)], 1.0, SplineFlags::RUNMODE);

        controller.tick(&mut unit, &mut world, 0.25);
        assert_eq!(controller.spline().unwrap().elapsed_ms, 250.0);
        controller.tick(&mut unit, &mut world, 5.0);
        assert_eq!(controller.spline().unwrap().elapsed_ms, 1000.0);
    }

    #[test]
    fn test_move_random() {
        let mut world = LocalWorld::new();
        let (mut unit, mut controller) = creature_at(Vector3::ZERO);

        // Too steep
        world.random_points.push_back(Vector3::new(3.0, 3.0, 4.0));
        assert!(!controller.move_random(&mut unit, &mut world, Vector3::ZERO, 5.0, None));
        assert!(!controller.is_moving());

        // Inactive foreign cell
        world.all_cells_active = false;
        world.random_points.push_back(Vector3::new(4000.0, 0.0, 0.0));
        assert!(!controller.move_random(&mut unit, &mut world, Vector3::ZERO, 5000.0, None));

        // Same cell as the unit is always fine
        let here = Vector3::new(1.0, 1.0, 0.5);
        unit.current_cell = Some(world.cell_key(0, here.x, here.y));
        world.random_points.push_back(here);
        assert!(controller.move_random(&mut unit, &mut world, Vector3::ZERO, 5.0, None));
        assert_eq!(controller.speed(), MotionConfig::default().default_walk_speed);
        assert_eq!(controller.spline().unwrap().flags, SplineFlags::RUNMODE);
    }

    #[test]
    fn test_move_random_uses_cell_reached_by_walking() {
        let mut world = LocalWorld::new();
        world.cell_size = 10.0;
        world.all_cells_active = false;
        let (mut unit, mut controller) = creature_at(Vector3::ZERO);

        controller.begin_path(&mut unit, &mut world, &[Vector3::new(15.0, 0.0, 0.0)], 5.0, SplineFlags::RUNMODE);
        controller.tick(&mut unit, &mut world, 3.5);
        assert_eq!(unit.current_cell, Some(world.cell_key(0, 15.0, 0.0)));

        // Inactive, but it is the cell the unit walked into
        world.random_points.push_back(Vector3::new(16.0, 1.0, 0.5));
        let start = unit.location;
        assert!(controller.move_random(&mut unit, &mut world, start, 5.0, None));
    }

    proptest! {
        #[test]
        fn prop_waypoints_are_reached_exactly(
            legs in prop::collection::vec((-50i32..50, -50i32..50, -5i32..5), 1..6),
            speed in 1u32..20,
            frame_ms in 10u32..500,
        ) {
            let mut world = LocalWorld::new();
            let (mut unit, mut controller) = creature_at(Vector3::ZERO);
            let points: Vec<Vector3> = legs
                .iter()
                .map(|&(x, y, z)| Vector3::new(x as f32, y as f32, z as f32))
                .collect();

            prop_assert!(controller.begin_path(&mut unit, &mut world, &points, speed as f32, SplineFlags::RUNMODE));
            let arrivals: Vec<f32> = controller.pending_waypoints().iter().map(|wp| wp.expected_timestamp).collect();
            prop_assert!(arrivals.windows(2).all(|w| w[0] <= w[1]));

            let frame = frame_ms as f32 / 1000.0;
            let mut reached = Vec::new();
            let mut finished = false;
            for _ in 0..100_000 {
                let queued = controller.pending_waypoints().len();
                match controller.tick(&mut unit, &mut world, frame) {
                    Some(MotionEvent::WaypointReached { id, location }) => {
                        prop_assert_eq!(controller.pending_waypoints().len(), queued - 1);
                        prop_assert!(unit.location.same_position(location));
                        reached.push(id);
                    }
                    Some(MotionEvent::PathFinished { .. }) => {
                        finished = true;
                        break;
                    }
                    None => prop_assert_eq!(controller.pending_waypoints().len(), queued),
                }
            }

            prop_assert!(finished);
            prop_assert_eq!(reached, (0..points.len() as u32).collect::<Vec<_>>());
            prop_assert!(unit.location.same_position(*points.last().unwrap()));
            prop_assert_eq!(controller.state(), MotionState::Idle);
        }
    }
}
