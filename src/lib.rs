//! Bowlsim - a cricket bowling machine simulator
//!
//! A bowling machine releases a ball at a randomly chosen point inside the
//! pitching zone, plans a launch velocity that compensates for the real-time
//! integrator's deviation from ideal projectile motion, corrects the flight
//! frame by frame, and shapes the bounce so the planned trajectory survives
//! pitching.

// Core modules
pub mod constants;
pub mod events;
pub mod helpers;
pub mod simulation;
pub mod tuning;

// Simulation logic modules
pub mod ball;
pub mod bowling;
pub mod world;

// Re-export commonly used types for convenience
pub use ball::{AngularVelocity, Ball, BallCondition, BallFlight, Velocity};
pub use bowling::{
    BowlError, CompensationResult, DeliveryCounter, DeliveryPlan, DeliveryRng, DespawnSchedule,
    LastDeliveryInfo, PendingBowl, SurfaceContact, select_target, solve_velocity, zone_rect,
};
pub use constants::*;
pub use events::{BusEvent, DeliveryEvent, EventBus, update_event_bus_time};
pub use helpers::*;
pub use simulation::{DeliveryStats, HeadlessAppBuilder, RunConfig, run_deliveries};
pub use tuning::{BowlingTuning, BowlingTweaks, apply_global_tuning};
pub use world::{SpawnPoint, SurfaceKind, TargetZone, Wicket, ZoneRect, spawn_pitch};

use bevy::prelude::*;

// =============================================================================
// TRAJECTORY MATH (shared by the solver, the in-flight corrector, and tools)
// =============================================================================

/// Vertical launch speed that makes an ideal arc cross `delta_y` after
/// `flight_time` seconds, from `delta_y = vy*t - g*t^2/2`.
pub fn required_vertical_speed(delta_y: f32, flight_time: f32, gravity: f32) -> f32 {
    if flight_time <= 0.0 {
        return 0.0;
    }
    delta_y / flight_time + 0.5 * gravity * flight_time
}

/// Time for an ideal arc starting with vertical speed `vy` to descend `drop`
/// meters below its start. None when the arc never gets that low
/// (negative drop larger than the apex height).
pub fn descent_time(vy: f32, drop: f32, gravity: f32) -> Option<f32> {
    let disc = vy * vy + 2.0 * gravity * drop;
    if disc < 0.0 {
        return None;
    }
    let t = (vy + disc.sqrt()) / gravity;
    if t <= 0.0 { None } else { Some(t) }
}

/// Analytically predicted landing point of an ideal free flight from `pos`
/// with velocity `vel`, landing at height `target_y`. No drag, no timestep:
/// this is the closed-form arc, deliberately not the live integrator.
pub fn predict_landing(pos: Vec3, vel: Vec3, target_y: f32, gravity: f32) -> Option<Vec3> {
    let t = descent_time(vel.y, pos.y - target_y, gravity)?;
    Some(Vec3::new(pos.x + vel.x * t, target_y, pos.z + vel.z * t))
}

/// Exact velocity that lands a ball at `target` from `pos`, covering the
/// horizontal distance at `speed`. Vertical speed comes from the closed form,
/// unfloored: in-flight corrections must be allowed to dive.
pub fn exact_velocity_to(pos: Vec3, target: Vec3, speed: f32, gravity: f32) -> Vec3 {
    let to = target - pos;
    let flat = helpers::flatten(to);
    let dist = flat.length();
    if dist < 1e-4 || speed <= 0.0 {
        // Directly above the target: drop straight down
        return Vec3::new(0.0, -speed.abs().max(1.0), 0.0);
    }
    let dir = flat / dist;
    let t = dist / speed;
    let vy = required_vertical_speed(to.y, t, gravity);
    Vec3::new(dir.x * speed, vy, dir.z * speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GRAVITY;

    #[test]
    fn test_required_vertical_speed_round_trip() {
        // Launch with the computed vy and check the arc height after t
        let t = 0.8;
        let delta_y = -1.5;
        let vy = required_vertical_speed(delta_y, t, GRAVITY);
        let reached = vy * t - 0.5 * GRAVITY * t * t;
        assert!((reached - delta_y).abs() < 1e-4);
    }

    #[test]
    fn test_descent_time_flat_drop() {
        // Free fall from 2 m with no vertical speed: t = sqrt(2h/g)
        let t = descent_time(0.0, 2.0, GRAVITY).unwrap();
        assert!((t - (2.0 * 2.0 / GRAVITY).sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_descent_time_unreachable_height() {
        // Rising at 1 m/s can climb ~5 cm; a 2 m climb is unreachable
        assert!(descent_time(1.0, -2.0, GRAVITY).is_none());
    }

    #[test]
    fn test_predict_landing_hits_plane() {
        let pos = Vec3::new(0.0, 2.0, -10.0);
        let vel = Vec3::new(0.0, 2.0, 15.0);
        let landing = predict_landing(pos, vel, 0.0, GRAVITY).unwrap();
        assert_eq!(landing.y, 0.0);
        assert!(landing.z > -10.0);
    }

    #[test]
    fn test_exact_velocity_lands_on_target() {
        let pos = Vec3::new(0.5, 1.2, -3.0);
        let target = Vec3::new(0.0, 0.036, 0.0);
        let v = exact_velocity_to(pos, target, 25.0, GRAVITY);
        let landing = predict_landing(pos, v, target.y, GRAVITY).unwrap();
        assert!(landing.distance(target) < 1e-3);
    }

    #[test]
    fn test_exact_velocity_above_target_drops() {
        let pos = Vec3::new(0.0, 1.0, 0.0);
        let target = Vec3::new(0.0, 0.0, 0.0);
        let v = exact_velocity_to(pos, target, 25.0, GRAVITY);
        assert!(v.y < 0.0);
        assert_eq!(helpers::flatten(v), Vec3::ZERO);
    }
}
