//! Aim point selection inside the pitching zone

use bevy::prelude::*;
use rand::Rng;

use crate::constants::BALL_RADIUS;
use crate::world::{TargetZone, ZoneRect};

/// Resolve the zone rectangle for a delivery: explicit corners when authored,
/// otherwise the zone entity's center/scale transform.
pub fn zone_rect(zone: &TargetZone, transform: &Transform) -> ZoneRect {
    match &zone.corners {
        Some(corners) => ZoneRect::from_corners(corners),
        None => ZoneRect::from_center_scale(transform),
    }
}

/// Pick a random aim point inside `rect`, keeping `margin` clear of every
/// edge. `shrink` scales the sampled band around the center so most picks sit
/// well inside the zone. The returned Y is the ball-center height at contact.
pub fn select_target(rect: ZoneRect, shrink: f32, margin: f32, rng: &mut impl Rng) -> Vec3 {
    let center = rect.center();
    let half_x = (rect.max_x - rect.min_x) / 2.0 * shrink;
    let half_z = (rect.max_z - rect.min_z) / 2.0 * shrink;

    let lo_x = rect.min_x + margin;
    let hi_x = rect.max_x - margin;
    let lo_z = rect.min_z + margin;
    let hi_z = rect.max_z - margin;
    if lo_x > hi_x || lo_z > hi_z {
        // Margins overlap: the zone is too small to inset, aim dead center
        warn!("pitching zone smaller than safety margins, aiming at center");
        return Vec3::new(center.x, rect.ground_y + BALL_RADIUS, center.z);
    }

    let x = if half_x > 0.0 {
        rng.gen_range(center.x - half_x..center.x + half_x)
    } else {
        center.x
    };
    let z = if half_z > 0.0 {
        rng.gen_range(center.z - half_z..center.z + half_z)
    } else {
        center.z
    };

    Vec3::new(
        x.clamp(lo_x, hi_x),
        rect.ground_y + BALL_RADIUS,
        z.clamp(lo_z, hi_z),
    )
}
