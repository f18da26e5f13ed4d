//! Realm Sim
//!
//! Headless driver for the aura and motion engines.
//! Runs a periodic aura and two unit paths against the in-memory world.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use realm_sim::{
    config::SimConfig,
    core::{DeterministicRng, Vector3},
    movement::{MotionController, MotionEvent, SplineFlags},
    spell::{AuraType, CastContext, EffectSlot, SpellEffect, SpellEffectType, SpellEntry, SpellRadius},
    world::{LocalWorld, ManualClock, Unit},
    VERSION,
};

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let document = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config {path}"))?;
            SimConfig::from_json(&document).with_context(|| format!("failed to load config {path}"))?
        }
        None => SimConfig::default(),
    };

    info!("Realm Sim v{}", VERSION);
    info!("Tick Rate: {} Hz", config.tick_rate);

    demo_aura(&config)?;
    demo_motion(&config)?;
    Ok(())
}

/// Run a damage-over-time aura to expiry.
fn demo_aura(config: &SimConfig) -> Result<()> {
    info!("=== Periodic Aura ===");

    let mut entry = SpellEntry { id: 172, ..Default::default() };
    entry.effects[0] = EffectSlot {
        effect: SpellEffectType::APPLY_AURA,
        die_sides: 1,
        base_points: 11,
        aura: AuraType::PERIODIC_DAMAGE,
        aura_period: 3000,
        radius_index: 8,
        ..Default::default()
    };
    let radii = BTreeMap::from([(8u32, SpellRadius { radius: 5.0, radius_per_level: 0.0, radius_max: 5.0 })]);

    let mut effect = SpellEffect::new(&entry, 0, CastContext::timed(10, 15_000), &radii, &config.aura)
        .context("failed to build aura effect")?;
    let mut clock = ManualClock::at(1_000.0);
    let mut rng = DeterministicRng::new(12345);

    if !effect.start_aura_duration(&clock, false) {
        warn!("aura did not start");
        return Ok(());
    }
    info!(
        "Spell {} effect {}: period {} ms, ticks {:?}",
        effect.spell_id,
        effect.effect_index,
        effect.aura_period,
        effect.aura.pending_ticks()
    );

    let frame = config.frame_secs() as f64;
    let mut fired = 0;
    while !effect.aura.is_expired() {
        clock.advance(frame);
        effect.update_effect_aura(clock.now);
        if !effect.is_past_next_period() {
            continue;
        }
        for _ in 0..effect.remove_old_periodic_effect_ticks() {
            fired += 1;
            info!(
                "Tick {} at {:.2}s: {} damage, {:.0} ms left",
                fired,
                clock.now - 1_000.0,
                effect.effect_points(&mut rng),
                effect.aura.remaining_ms().unwrap_or(0.0)
            );
        }
    }

    info!("Aura expired after {} ticks (radius {:.1})", fired, effect.radius());
    Ok(())
}

/// Walk a creature along a path and fly a player to a taxi destination.
fn demo_motion(config: &SimConfig) -> Result<()> {
    info!("=== Waypoint Motion ===");

    let mut world = LocalWorld::new();
    world.uptime = 3_600.0;
    world.ground_height = Some(0.0);

    let mut creature = Unit::creature(0xF130_0000_0000_0001, 0, Vector3::ZERO);
    let mut walker = MotionController::new(&creature, config.motion.clone());
    let path = [Vector3::new(4.0, 0.0, 0.0), Vector3::new(4.0, 6.0, 0.0), Vector3::new(0.0, 6.0, 0.0)];
    walker.begin_path(&mut creature, &mut world, &path, 2.0, SplineFlags::RUNMODE);

    if let Some(sent) = world.last_broadcast() {
        let decoded = realm_sim::movement::DecodedMove::from_bytes(&sent.payload)
            .context("failed to decode movement packet")?;
        info!("Packet {:#05x}: {}", sent.opcode, hex::encode(&sent.payload));
        info!(
            "  guid {:#x}, start {} ms, {} waypoints, {} ms total",
            decoded.header.guid,
            decoded.header.start_time,
            decoded.waypoints.len(),
            decoded.path.total_time_ms
        );
    }

    let mut player = Unit::player(0x42, 0, Vector3::new(0.0, 0.0, 40.0));
    player.pending_taxi_destination = Some(Vector3::new(200.0, 0.0, 5.0));
    let mut flier = MotionController::new(&player, config.motion.clone());
    let route = [Vector3::new(30.0, 0.0, 40.0), Vector3::new(60.0, 10.0, 40.0)];
    flier.begin_path(&mut player, &mut world, &route, 14.0, SplineFlags::FLYING);

    let frame = config.frame_secs();
    let mut frames = 0u32;
    while walker.is_active() || flier.is_active() {
        world.advance_uptime(frame as f64);
        frames += 1;

        for (unit, controller) in [(&mut creature, &mut walker), (&mut player, &mut flier)] {
            match controller.tick(unit, &mut world, frame) {
                Some(MotionEvent::WaypointReached { id, location }) => {
                    info!("Unit {:#x} reached waypoint {} at {}", unit.guid, id, location);
                }
                Some(MotionEvent::PathFinished { taxi_arrival }) => {
                    info!("Unit {:#x} finished its path at {} (taxi: {})", unit.guid, unit.location, taxi_arrival);
                }
                None => {}
            }
        }
    }

    info!(
        "Motion done after {} frames: {} position writes, {} teleports",
        frames,
        world.position_updates,
        world.teleports.len()
    );
    Ok(())
}
