//! Delivery orchestration: the bowl operation and ball lifecycle
//!
//! A delivery is atomic within one run of `bowl_delivery`: resolve the spawn
//! and zone, pick the aim point, solve the launch velocity, and release the
//! ball before any correction or collision system sees it. All per-delivery
//! state lives in the `DeliveryPlan` on the ball entity, so overlapping
//! deliveries can never share an aim point.

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ball::{AngularVelocity, Ball, BallCondition, BallFlight, Velocity};
use crate::bowling::solver::{CompensationResult, solve_velocity};
use crate::bowling::target::{select_target, zone_rect};
use crate::constants::*;
use crate::events::{DeliveryEvent, EventBus};
use crate::tuning::BowlingTweaks;
use crate::world::{SpawnPoint, TargetZone};

/// Per-delivery context created by the bowl operation and carried on the ball
#[derive(Component, Debug, Clone)]
pub struct DeliveryPlan {
    pub id: u64,
    /// Fixed aim point for this delivery
    pub target: Vec3,
    pub spawn: Vec3,
    pub nominal_speed: f32,
    pub launch_velocity: Vec3,
    pub compensation: CompensationResult,
}

/// Set to request a delivery; consumed by `bowl_delivery` on the next step
#[derive(Resource, Default)]
pub struct PendingBowl(pub bool);

/// Monotonic delivery id source
#[derive(Resource, Default)]
pub struct DeliveryCounter(pub u64);

/// Seedable RNG for deterministic runs; falls back to thread RNG when unset
#[derive(Resource, Default)]
pub struct DeliveryRng(pub Option<StdRng>);

impl DeliveryRng {
    pub fn seeded(seed: u64) -> Self {
        Self(Some(StdRng::seed_from_u64(seed)))
    }
}

/// Diagnostics for the most recent delivery
#[derive(Resource, Default, Debug, Clone)]
pub struct LastDeliveryInfo {
    pub delivery_id: u64,
    pub target: Vec3,
    pub launch_velocity: Vec3,
    pub compensation_factor: f32,
    pub predicted_error: f32,
    /// Measured landing error, set when the ball pitches
    pub landing_error: Option<f32>,
    pub heading_corrections: u32,
    pub final_corrections: u32,
}

/// Pending ball removals, keyed by delivery id so a new delivery can cancel
/// its predecessor's timer
#[derive(Resource, Default)]
pub struct DespawnSchedule {
    pub entries: Vec<DespawnEntry>,
}

#[derive(Debug, Clone, Copy)]
pub struct DespawnEntry {
    pub delivery_id: u64,
    pub entity: Entity,
    pub remaining: f32,
}

/// Configuration errors that refuse a delivery outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BowlError {
    MissingSpawn,
    MissingZone,
    InvalidSpeed,
}

impl std::fmt::Display for BowlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BowlError::MissingSpawn => write!(f, "no spawn point in the scene"),
            BowlError::MissingZone => write!(f, "no target zone in the scene"),
            BowlError::InvalidSpeed => write!(f, "nominal speed must be positive"),
        }
    }
}

/// Execute a requested delivery: target, solve, release.
#[allow(clippy::too_many_arguments)]
pub fn bowl_delivery(
    mut pending: ResMut<PendingBowl>,
    mut counter: ResMut<DeliveryCounter>,
    mut rng: ResMut<DeliveryRng>,
    tweaks: Res<BowlingTweaks>,
    mut info: ResMut<LastDeliveryInfo>,
    mut bus: ResMut<EventBus>,
    mut schedule: ResMut<DespawnSchedule>,
    mut condition: ResMut<BallCondition>,
    mut commands: Commands,
    spawn_query: Query<&Transform, With<SpawnPoint>>,
    zone_query: Query<(&TargetZone, &Transform), Without<SpawnPoint>>,
    ball_query: Query<Entity, With<Ball>>,
) {
    if !pending.0 {
        return;
    }
    pending.0 = false;

    let refuse = |bus: &mut EventBus, err: BowlError| {
        warn!("delivery refused: {}", err);
        bus.emit(DeliveryEvent::DeliveryFault {
            reason: err.to_string(),
        });
    };

    let Ok(spawn_transform) = spawn_query.single() else {
        refuse(&mut bus, BowlError::MissingSpawn);
        return;
    };
    let Ok((zone, zone_transform)) = zone_query.single() else {
        refuse(&mut bus, BowlError::MissingZone);
        return;
    };
    if tweaks.nominal_speed <= 0.0 {
        refuse(&mut bus, BowlError::InvalidSpeed);
        return;
    }

    let spawn = spawn_transform.translation;
    let rect = zone_rect(zone, zone_transform);
    let target = match rng.0.as_mut() {
        Some(seeded) => select_target(rect, tweaks.target_shrink, tweaks.target_margin, seeded),
        None => select_target(
            rect,
            tweaks.target_shrink,
            tweaks.target_margin,
            &mut rand::thread_rng(),
        ),
    };

    let (velocity, compensation) =
        solve_velocity(spawn, Some(target), tweaks.nominal_speed, &tweaks);

    // One tracked ball per machine: the previous delivery's ball goes away
    // now, along with its despawn timer
    for entity in &ball_query {
        commands.entity(entity).despawn();
    }
    schedule.entries.clear();

    counter.0 += 1;
    let id = counter.0;
    commands.spawn((
        Ball,
        Transform::from_translation(spawn),
        Velocity(velocity),
        AngularVelocity(Vec3::new(-SEAM_SPIN_RATE, 0.0, 0.0)),
        BallFlight::default(),
        DeliveryPlan {
            id,
            target,
            spawn,
            nominal_speed: tweaks.nominal_speed,
            launch_velocity: velocity,
            compensation,
        },
    ));

    condition.advance_delivery();
    *info = LastDeliveryInfo {
        delivery_id: id,
        target,
        launch_velocity: velocity,
        compensation_factor: compensation.factor,
        predicted_error: compensation.error,
        landing_error: None,
        heading_corrections: 0,
        final_corrections: 0,
    };

    info!(
        "delivery {}: target ({:.2}, {:.2}), factor {:.3}, predicted error {:.3} m",
        id, target.x, target.z, compensation.factor, compensation.error
    );
    bus.emit(DeliveryEvent::BallBowled {
        delivery_id: id,
        target: (target.x, target.z),
        launch_speed: velocity.length(),
        compensation_factor: compensation.factor,
        predicted_error: compensation.error,
    });
}

/// Detect a ball at rest and schedule its removal
pub fn ball_stop_update(
    mut bus: ResMut<EventBus>,
    mut schedule: ResMut<DespawnSchedule>,
    mut query: Query<
        (Entity, &Velocity, &AngularVelocity, &mut BallFlight, &DeliveryPlan),
        With<Ball>,
    >,
) {
    for (entity, velocity, spin, mut flight, plan) in &mut query {
        if flight.stopped || !(flight.rolling || flight.has_landed) {
            continue;
        }
        if velocity.0.length() < STOP_SPEED && spin.0.length() < STOP_SPIN {
            flight.stopped = true;
            info!("delivery {} ball stopped", plan.id);
            bus.emit(DeliveryEvent::BallStopped {
                delivery_id: plan.id,
            });
            schedule.entries.push(DespawnEntry {
                delivery_id: plan.id,
                entity,
                remaining: DESPAWN_DELAY,
            });
        }
    }
}

/// Tick despawn timers and remove expired balls
pub fn process_despawn_timers(
    time: Res<Time>,
    mut schedule: ResMut<DespawnSchedule>,
    mut commands: Commands,
) {
    // Use minimum dt for headless mode compatibility
    let dt = time.delta_secs().max(1.0 / 60.0);

    schedule.entries.retain_mut(|entry| {
        entry.remaining -= dt;
        if entry.remaining <= 0.0 {
            commands.entity(entry.entity).despawn();
            false
        } else {
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::HeadlessAppBuilder;

    fn ball_entities(app: &mut App) -> Vec<Entity> {
        let mut query = app.world_mut().query_filtered::<Entity, With<Ball>>();
        query.iter(app.world()).collect()
    }

    #[test]
    fn test_new_delivery_replaces_ball_and_cancels_timer() {
        let mut app = HeadlessAppBuilder::new().with_seed(5).build();
        app.update();

        app.world_mut().resource_mut::<PendingBowl>().0 = true;
        app.update();
        let first = ball_entities(&mut app);
        assert_eq!(first.len(), 1);

        // First ball stopped and is waiting on its removal timer
        app.world_mut()
            .resource_mut::<DespawnSchedule>()
            .entries
            .push(DespawnEntry {
                delivery_id: 1,
                entity: first[0],
                remaining: DESPAWN_DELAY,
            });

        app.world_mut().resource_mut::<PendingBowl>().0 = true;
        app.update();

        let balls = ball_entities(&mut app);
        assert_eq!(balls.len(), 1, "exactly one tracked ball");
        assert_ne!(balls[0], first[0], "previous ball must be despawned");
        assert!(
            app.world().resource::<DespawnSchedule>().entries.is_empty(),
            "predecessor's despawn timer must be cancelled"
        );
        assert_eq!(app.world().resource::<DeliveryCounter>().0, 2);
    }

    #[test]
    fn test_missing_scene_refuses_delivery() {
        let mut app = HeadlessAppBuilder::new().without_pitch().build();
        app.update();

        app.world_mut().resource_mut::<PendingBowl>().0 = true;
        app.update();

        assert!(ball_entities(&mut app).is_empty(), "no ball may spawn");
        assert_eq!(app.world().resource::<DeliveryCounter>().0, 0);

        let events = app.world_mut().resource_mut::<EventBus>().drain();
        assert!(
            events
                .iter()
                .any(|e| matches!(e.event, DeliveryEvent::DeliveryFault { .. })),
            "refusal must emit a fault event"
        );
    }

    #[test]
    fn test_invalid_speed_refuses_delivery() {
        let mut app = HeadlessAppBuilder::new()
            .with_nominal_speed(0.0)
            .build();
        app.update();

        app.world_mut().resource_mut::<PendingBowl>().0 = true;
        app.update();

        assert!(ball_entities(&mut app).is_empty());
        let events = app.world_mut().resource_mut::<EventBus>().drain();
        assert!(
            events
                .iter()
                .any(|e| matches!(e.event, DeliveryEvent::DeliveryFault { .. }))
        );
    }
}
