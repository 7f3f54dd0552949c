//! In-flight trajectory correction
//!
//! Two threshold-gated corrections run every simulation step while a ball is
//! airborne. Each frame re-derives a fresh correction from current state;
//! nothing is persisted, so a correction applied twice to the same state is
//! the same correction.

use bevy::prelude::*;

use crate::ball::{Ball, BallFlight, Velocity};
use crate::bowling::delivery::{DeliveryPlan, LastDeliveryInfo};
use crate::exact_velocity_to;
use crate::helpers::horizontal_angle_between;
use crate::tuning::BowlingTweaks;

/// Heading and final-approach corrections, gated on distance to target.
pub fn flight_correction(
    tweaks: Res<BowlingTweaks>,
    mut info: ResMut<LastDeliveryInfo>,
    mut query: Query<(&Transform, &mut Velocity, &BallFlight, &DeliveryPlan), With<Ball>>,
) {
    for (transform, mut velocity, flight, plan) in &mut query {
        // Corrections only apply to airborne balls
        if flight.has_landed || flight.rolling || flight.stopped {
            continue;
        }

        let pos = transform.translation;
        let dist = pos.distance(plan.target);

        if dist > tweaks.final_approach_min && dist < tweaks.heading_band_min {
            // Final guarantee: force the exact landing velocity, no angle gate
            velocity.0 =
                exact_velocity_to(pos, plan.target, plan.nominal_speed, tweaks.gravity);
            info.final_corrections += 1;
        } else if dist >= tweaks.heading_band_min && dist <= tweaks.heading_band_max {
            let off_angle = horizontal_angle_between(velocity.0, plan.target - pos);
            if off_angle > tweaks.heading_angle_limit {
                velocity.0 =
                    exact_velocity_to(pos, plan.target, plan.nominal_speed, tweaks.gravity);
                info.heading_corrections += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bowling::solver::CompensationResult;
    use crate::constants::GRAVITY;
    use crate::helpers::flatten;

    fn plan_for(target: Vec3) -> DeliveryPlan {
        DeliveryPlan {
            id: 1,
            target,
            spawn: Vec3::new(0.0, 2.0, -18.0),
            nominal_speed: 25.0,
            launch_velocity: Vec3::ZERO,
            compensation: CompensationResult {
                factor: 1.0,
                error: 0.0,
            },
        }
    }

    #[test]
    fn test_rolling_ball_is_not_relaunched() {
        // A ball that missed the zone can be rolling inside the
        // final-approach band; the overwrite must leave it alone
        let mut app = App::new();
        app.init_resource::<BowlingTweaks>();
        app.init_resource::<LastDeliveryInfo>();
        app.add_systems(Update, flight_correction);

        let target = Vec3::new(0.0, 0.036, 0.0);
        let roll_velocity = Vec3::new(0.0, 0.0, 0.8);
        let ball = app
            .world_mut()
            .spawn((
                Ball,
                Transform::from_translation(Vec3::new(0.0, 0.036, -0.5)),
                Velocity(roll_velocity),
                BallFlight {
                    rolling: true,
                    ..Default::default()
                },
                plan_for(target),
            ))
            .id();

        app.update();

        let velocity = app.world().get::<Velocity>(ball).unwrap();
        assert_eq!(velocity.0, roll_velocity);
        assert_eq!(app.world().resource::<LastDeliveryInfo>().final_corrections, 0);
    }

    #[test]
    fn test_airborne_ball_in_final_band_is_corrected() {
        let mut app = App::new();
        app.init_resource::<BowlingTweaks>();
        app.init_resource::<LastDeliveryInfo>();
        app.add_systems(Update, flight_correction);

        let target = Vec3::new(0.0, 0.036, 0.0);
        let ball = app
            .world_mut()
            .spawn((
                Ball,
                Transform::from_translation(Vec3::new(0.0, 0.5, -0.6)),
                Velocity(Vec3::new(0.0, -3.0, 12.0)),
                BallFlight::default(),
                plan_for(target),
            ))
            .id();

        app.update();

        let velocity = app.world().get::<Velocity>(ball).unwrap();
        assert!(velocity.0.y < 0.0, "final approach should dive the ball");
        assert_eq!(app.world().resource::<LastDeliveryInfo>().final_corrections, 1);
    }

    #[test]
    fn test_heading_correction_zeroes_angle_error() {
        // Ball 3 m from target, heading 20 degrees off
        let pos = Vec3::new(0.0, 1.0, -3.0);
        let target = Vec3::new(0.0, 0.036, 0.0);
        let to_target = target - pos;

        let off = Quat::from_rotation_y(20.0_f32.to_radians()) * flatten(to_target).normalize();
        let wrong_velocity = off * 25.0;
        assert!(horizontal_angle_between(wrong_velocity, to_target) > 19.0);

        let corrected = exact_velocity_to(pos, target, 25.0, GRAVITY);
        assert!(horizontal_angle_between(corrected, to_target) < 1e-3);
    }

    #[test]
    fn test_final_approach_is_idempotent() {
        // Same ball state twice produces the same corrected velocity
        let pos = Vec3::new(0.1, 0.5, -0.8);
        let target = Vec3::new(0.0, 0.036, 0.0);
        let first = exact_velocity_to(pos, target, 25.0, GRAVITY);
        let second = exact_velocity_to(pos, target, 25.0, GRAVITY);
        assert_eq!(first, second);
    }

    #[test]
    fn test_corrected_velocity_lands_on_target() {
        let pos = Vec3::new(0.3, 0.9, -2.5);
        let target = Vec3::new(-0.2, 0.036, -4.0);
        let v = exact_velocity_to(pos, target, 25.0, GRAVITY);
        let landing = crate::predict_landing(pos, v, target.y, GRAVITY).unwrap();
        assert!(flatten(landing - target).length() < 1e-3);
    }
}
