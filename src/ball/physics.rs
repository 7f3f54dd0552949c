//! Ball physics integration
//!
//! This is the real-time integrator the compensation search corrects for:
//! discrete timestep, exponential air drag, and spin decay all pull the flight
//! away from the ideal closed-form arc the solver plans with.

use bevy::prelude::*;

use crate::ball::components::*;
use crate::constants::*;
use crate::tuning::BowlingTweaks;

/// Apply velocity to all entities with a Velocity component
pub fn apply_velocity(mut query: Query<(&mut Transform, &Velocity)>, time: Res<Time>) {
    // Use minimum dt for headless mode compatibility
    let dt = time.delta_secs().max(1.0 / 60.0);

    for (mut transform, velocity) in &mut query {
        transform.translation += velocity.0 * dt;
    }
}

/// Advance flight clocks and apply gravity, drag, and spin decay
pub fn ball_flight_step(
    tweaks: Res<BowlingTweaks>,
    mut query: Query<(&mut Velocity, &mut AngularVelocity, &mut BallFlight), With<Ball>>,
    time: Res<Time>,
) {
    // Use minimum dt for headless mode compatibility
    let dt = time.delta_secs().max(1.0 / 60.0);

    for (mut velocity, mut spin, mut flight) in &mut query {
        flight.airtime += dt;

        if flight.stopped {
            velocity.0 = Vec3::ZERO;
            spin.0 = Vec3::ZERO;
            continue;
        }

        if flight.rolling {
            // Rolling on ground: no gravity, rolling friction
            velocity.0.y = 0.0;
            let keep = tweaks.roll_friction.powf(dt);
            velocity.0.x *= keep;
            velocity.0.z *= keep;
            spin.0 *= keep;
        } else {
            // In air: gravity plus horizontal drag
            velocity.0.y -= tweaks.gravity * dt;
            let keep = tweaks.air_drag.powf(dt);
            velocity.0.x *= keep;
            velocity.0.z *= keep;
            spin.0 *= BALL_SPIN_AIR_DECAY.powf(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_step_applies_gravity() {
        let mut app = App::new();
        app.add_plugins(bevy::time::TimePlugin);
        app.init_resource::<BowlingTweaks>();
        app.add_systems(Update, ball_flight_step);

        let ball = app
            .world_mut()
            .spawn((
                Ball,
                Velocity(Vec3::new(0.0, 0.0, 20.0)),
                AngularVelocity(Vec3::ZERO),
                BallFlight::default(),
            ))
            .id();

        app.update();
        app.update();

        let velocity = app.world().get::<Velocity>(ball).unwrap();
        assert!(velocity.0.y < -0.2, "gravity should pull vy down");
        assert!(velocity.0.z < 20.0, "drag should slow horizontal motion");
        let flight = app.world().get::<BallFlight>(ball).unwrap();
        assert!(flight.airtime >= 2.0 / 60.0);
    }

    #[test]
    fn test_rolling_ball_decays_without_gravity() {
        let mut app = App::new();
        app.add_plugins(bevy::time::TimePlugin);
        app.init_resource::<BowlingTweaks>();
        app.add_systems(Update, ball_flight_step);

        let ball = app
            .world_mut()
            .spawn((
                Ball,
                Velocity(Vec3::new(0.0, 0.0, 2.0)),
                AngularVelocity(Vec3::ZERO),
                BallFlight {
                    rolling: true,
                    ..Default::default()
                },
            ))
            .id();

        app.update();

        let velocity = app.world().get::<Velocity>(ball).unwrap();
        assert_eq!(velocity.0.y, 0.0);
        assert!(velocity.0.z < 2.0);
    }
}
