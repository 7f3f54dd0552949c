//! Launch velocity solver
//!
//! The live integrator (drag, discrete timestep, spin decay) does not
//! reproduce ideal projectile motion, so a naive closed-form launch lands
//! short or long. Instead of modeling the integrator analytically, the solver
//! searches a scalar compensation factor on the flight time and keeps the
//! factor whose predicted landing sits closest to the target.

use bevy::prelude::*;

use crate::constants::*;
use crate::helpers::flatten;
use crate::tuning::BowlingTweaks;
use crate::{predict_landing, required_vertical_speed};

/// Best-found compensation factor and its predicted landing error (meters)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompensationResult {
    pub factor: f32,
    pub error: f32,
}

/// Candidate launch velocity for one compensation factor: flight time is
/// `dist / (speed * factor)`, vertical speed comes from the closed form with
/// the full-toss floor applied.
fn candidate_velocity(
    dir: Vec3,
    dist: f32,
    delta_y: f32,
    speed: f32,
    factor: f32,
    tweaks: &BowlingTweaks,
) -> Vec3 {
    let flight_time = dist / (speed * factor);
    let vy = required_vertical_speed(delta_y, flight_time, tweaks.gravity)
        .max(tweaks.min_vertical_speed);
    let horizontal = dist / flight_time;
    Vec3::new(dir.x * horizontal, vy, dir.z * horizontal)
}

fn search_range(
    lo: f32,
    hi: f32,
    step: f32,
    dir: Vec3,
    dist: f32,
    spawn: Vec3,
    target: Vec3,
    speed: f32,
    tweaks: &BowlingTweaks,
) -> CompensationResult {
    let delta_y = target.y - spawn.y;
    let mut best = CompensationResult {
        factor: lo,
        error: f32::INFINITY,
    };

    let mut factor = lo;
    while factor <= hi + step * 0.5 {
        let v = candidate_velocity(dir, dist, delta_y, speed, factor, tweaks);
        let error = match predict_landing(spawn, v, target.y, tweaks.gravity) {
            Some(landing) => flatten(landing - target).length(),
            None => f32::INFINITY,
        };
        if error < best.error {
            best = CompensationResult { factor, error };
            if error < COMP_TOLERANCE {
                break;
            }
        }
        factor += step;
    }
    best
}

/// Find the launch velocity whose predicted free flight lands closest to
/// `target`. A coarse factor sweep runs first; if its best error is still
/// above the retry threshold, a wider and finer sweep takes over.
///
/// `target = None` is an ordering bug in the caller: logged, and answered
/// with a straight nominal-speed shot so the delivery degrades instead of
/// crashing.
pub fn solve_velocity(
    spawn: Vec3,
    target: Option<Vec3>,
    nominal_speed: f32,
    tweaks: &BowlingTweaks,
) -> (Vec3, CompensationResult) {
    let fallback = CompensationResult {
        factor: 1.0,
        error: f32::INFINITY,
    };
    let Some(target) = target else {
        warn!("solve_velocity called with no target set, bowling straight");
        return (Vec3::Z * nominal_speed.max(0.0), fallback);
    };

    let to = target - spawn;
    let flat = flatten(to);
    let dist = flat.length();
    if dist < 1e-4 || nominal_speed <= 0.0 {
        warn!("degenerate delivery geometry (dist {dist:.4}), bowling straight");
        return (Vec3::Z * nominal_speed.max(0.0), fallback);
    }
    let dir = flat / dist;

    let mut best = search_range(
        COMP_COARSE_MIN,
        COMP_COARSE_MAX,
        COMP_COARSE_STEP,
        dir,
        dist,
        spawn,
        target,
        nominal_speed,
        tweaks,
    );

    if best.error > COMP_RETRY_THRESHOLD {
        // Coarse pass missed: widen and refine
        let wide = search_range(
            COMP_WIDE_MIN,
            COMP_WIDE_MAX,
            COMP_WIDE_STEP,
            dir,
            dist,
            spawn,
            target,
            nominal_speed,
            tweaks,
        );
        if wide.error < best.error {
            best = wide;
        }
    }

    if best.error > COMP_RETRY_THRESHOLD {
        warn!(
            "compensation search fell short: best error {:.2} m at factor {:.3}",
            best.error, best.factor
        );
    }

    let velocity = candidate_velocity(dir, dist, to.y, nominal_speed, best.factor, tweaks);
    (velocity, best)
}
