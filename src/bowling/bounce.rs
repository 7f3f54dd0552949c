//! Surface contact detection and bounce response
//!
//! The bounce intentionally minimizes deviation from the planned trajectory
//! (speed floor plus a fixed low bounce height) instead of simulating a
//! physically natural rebound: the correctness criterion is landing accuracy,
//! not bounce realism.

use bevy::prelude::*;

use crate::ball::{AngularVelocity, Ball, BallCondition, BallFlight, Velocity};
use crate::bowling::delivery::{DeliveryPlan, LastDeliveryInfo};
use crate::bowling::target::zone_rect;
use crate::constants::*;
use crate::events::{DeliveryEvent, EventBus};
use crate::helpers::flatten;
use crate::tuning::BowlingTweaks;
use crate::world::{SurfaceKind, TargetZone, Wicket};

/// One contact event, produced per collision and consumed immediately
#[derive(Debug, Clone, Copy)]
pub struct SurfaceContact {
    pub point: Vec3,
    pub normal: Vec3,
    pub velocity: Vec3,
    pub kind: SurfaceKind,
}

/// Post-pitch velocity: flattened incoming direction, energy loss and
/// momentum boost with a forward-speed floor, fixed bounce height (the flat
/// constant when the ball arrives shallow).
pub fn pitch_bounce_velocity(incoming: Vec3, tweaks: &BowlingTweaks) -> Vec3 {
    let horizontal = flatten(incoming);
    let speed = horizontal.length();
    let dir = if speed > 1e-5 {
        horizontal / speed
    } else {
        Vec3::Z
    };

    let forward = (speed * (1.0 - tweaks.pitch_energy_loss) * tweaks.pitch_momentum_boost)
        .max(tweaks.pitch_min_forward_speed);
    let vertical = if incoming.y.abs() < tweaks.flat_delivery_threshold {
        tweaks.flat_bounce_height
    } else {
        tweaks.pitch_bounce_height
    };

    Vec3::new(dir.x * forward, vertical, dir.z * forward)
}

/// Post-ground-bounce velocity. Vertical speed decays with restitution and is
/// capped, so repeated bounces settle instead of ringing forever.
pub fn ground_bounce_velocity(incoming: Vec3, tweaks: &BowlingTweaks) -> Vec3 {
    let horizontal = flatten(incoming);
    let speed = horizontal.length();
    let dir = if speed > 1e-5 {
        horizontal / speed
    } else {
        Vec3::Z
    };

    let forward = (speed * (1.0 - tweaks.ground_energy_loss)).max(tweaks.ground_min_speed);
    let vertical = (incoming.y.abs() * GROUND_RESTITUTION).min(tweaks.ground_bounce_height);

    Vec3::new(dir.x * forward, vertical, dir.z * forward)
}

/// Detect ball/surface contacts, route them by surface kind, and apply the
/// bounce response. Detection and response run in one pass so the response
/// always sees the contact-frame velocity.
pub fn ball_surface_response(
    tweaks: Res<BowlingTweaks>,
    mut condition: ResMut<BallCondition>,
    mut info: ResMut<LastDeliveryInfo>,
    mut bus: ResMut<EventBus>,
    mut ball_query: Query<
        (
            &mut Transform,
            &mut Velocity,
            &mut AngularVelocity,
            &mut BallFlight,
            &DeliveryPlan,
        ),
        With<Ball>,
    >,
    zone_query: Query<(&TargetZone, &Transform), Without<Ball>>,
    wicket_query: Query<(&Transform, &Wicket), (Without<Ball>, Without<TargetZone>)>,
) {
    let rect = zone_query
        .single()
        .ok()
        .map(|(zone, transform)| zone_rect(zone, transform));

    for (mut transform, mut velocity, mut spin, mut flight, plan) in &mut ball_query {
        if flight.stopped {
            continue;
        }

        let pos = transform.translation;

        // Wicket: report once, never deflect
        if !flight.wicket_hit {
            for (wicket_transform, wicket) in &wicket_query {
                let rel = pos - wicket_transform.translation;
                let reach = wicket.half_extents + Vec3::splat(BALL_RADIUS);
                if rel.x.abs() <= reach.x && rel.y.abs() <= reach.y && rel.z.abs() <= reach.z {
                    let contact = SurfaceContact {
                        point: pos,
                        normal: -flatten(velocity.0).normalize_or_zero(),
                        velocity: velocity.0,
                        kind: SurfaceKind::Wicket,
                    };
                    route_contact(
                        contact, plan, &tweaks, &mut transform, &mut velocity, &mut spin,
                        &mut flight, &mut condition, &mut info, &mut bus,
                    );
                    break;
                }
            }
        }

        // Ground plane while descending
        let ground_y = rect.map(|r| r.ground_y).unwrap_or(GROUND_Y);
        let rest_height = ground_y + BALL_RADIUS;
        if velocity.0.y < 0.0 && transform.translation.y <= rest_height {
            // Back-interpolate along the velocity to the exact plane crossing
            let t_back = (rest_height - transform.translation.y) / velocity.0.y;
            let contact_point = transform.translation + velocity.0 * t_back;
            transform.translation = contact_point;

            let on_pitch = rect
                .map(|r| r.contains_xz(contact_point.x, contact_point.z))
                .unwrap_or(false);
            let kind = if !flight.has_landed && on_pitch {
                SurfaceKind::PitchingArea
            } else {
                SurfaceKind::Ground
            };
            let contact = SurfaceContact {
                point: Vec3::new(contact_point.x, ground_y, contact_point.z),
                normal: Vec3::Y,
                velocity: velocity.0,
                kind,
            };
            route_contact(
                contact, plan, &tweaks, &mut transform, &mut velocity, &mut spin, &mut flight,
                &mut condition, &mut info, &mut bus,
            );
        }
    }
}

/// Dispatch one contact to its response by surface kind.
#[allow(clippy::too_many_arguments)]
fn route_contact(
    contact: SurfaceContact,
    plan: &DeliveryPlan,
    tweaks: &BowlingTweaks,
    transform: &mut Transform,
    velocity: &mut Velocity,
    spin: &mut AngularVelocity,
    flight: &mut BallFlight,
    condition: &mut BallCondition,
    info: &mut LastDeliveryInfo,
    bus: &mut EventBus,
) {
    match contact.kind {
        SurfaceKind::PitchingArea => {
            // Terminal event for the aim phase: score the landing first
            let error = flatten(contact.point - plan.target).length();
            info.landing_error = Some(error);
            info!(
                "delivery {} pitched {:.2} m from target at ({:.2}, {:.2})",
                plan.id, error, contact.point.x, contact.point.z
            );
            bus.emit(DeliveryEvent::BallLanded {
                delivery_id: plan.id,
                point: (contact.point.x, contact.point.z),
                error,
            });

            velocity.0 = pitch_bounce_velocity(contact.velocity, tweaks);
            flight.has_landed = true;
            flight.bounce_count += 1;
            flight.last_ground_bounce = flight.airtime;
            condition.roughen(ROUGHNESS_PER_PITCH);
        }
        SurfaceKind::Ground => {
            // Duplicate-contact guard: ignore bounces inside the interval
            if flight.airtime - flight.last_ground_bounce < GROUND_BOUNCE_INTERVAL {
                return;
            }

            let bounced = ground_bounce_velocity(contact.velocity, tweaks);
            // Too little rebound to clear the ball's own radius: roll instead
            let rebound_height =
                (bounced.y * bounced.y) / (2.0 * tweaks.gravity);
            if rebound_height > BALL_RADIUS * BOUNCE_HEIGHT_MULT {
                velocity.0 = bounced;
            } else {
                velocity.0 = Vec3::new(bounced.x, 0.0, bounced.z);
                flight.rolling = true;
                transform.translation.y = contact.point.y + BALL_RADIUS;
            }
            spin.0 *= SPIN_DAMP_PER_BOUNCE;
            flight.bounce_count += 1;
            flight.last_ground_bounce = flight.airtime;
            condition.roughen(ROUGHNESS_PER_BOUNCE);
        }
        SurfaceKind::Wicket => {
            flight.wicket_hit = true;
            info!("delivery {} hit the wicket", plan.id);
            bus.emit(DeliveryEvent::WicketHit { delivery_id: plan.id });
        }
    }
}
