//! Headless App Builder
//!
//! Provides a reusable builder for creating headless Bevy apps that run the
//! bowling machine without any rendering. Used by the delivery runner, the
//! CLI binary, and tests.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use std::time::Duration;

use crate::ball::{BallCondition, apply_velocity, ball_flight_step};
use crate::bowling::{
    DeliveryCounter, DeliveryRng, DespawnSchedule, LastDeliveryInfo, PendingBowl,
    ball_stop_update, ball_surface_response, bowl_delivery, flight_correction,
    process_despawn_timers,
};
use crate::events::{EventBus, update_event_bus_time};
use crate::tuning::{self, BowlingTweaks};
use crate::world::spawn_pitch;

/// Builder for creating headless Bevy apps
pub struct HeadlessAppBuilder {
    fps: f32,
    seed: Option<u64>,
    nominal_speed: Option<f32>,
    minimal_threads: bool,
    spawn_pitch: bool,
    log: bool,
}

impl HeadlessAppBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            fps: 60.0,
            seed: None,
            nominal_speed: None,
            minimal_threads: false,
            spawn_pitch: true,
            log: false,
        }
    }

    /// Set the target FPS (default: 60)
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    /// Seed target selection for deterministic runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the delivery speed from config/defaults
    pub fn with_nominal_speed(mut self, speed: f32) -> Self {
        self.nominal_speed = Some(speed);
        self
    }

    /// Enable minimal thread mode (task pools = 1)
    ///
    /// Use this when running many apps in parallel to avoid hitting OS thread
    /// limits.
    pub fn with_minimal_threads(mut self) -> Self {
        self.minimal_threads = true;
        self
    }

    /// Skip the standard pitch layout (caller supplies its own scene)
    pub fn without_pitch(mut self) -> Self {
        self.spawn_pitch = false;
        self
    }

    /// Install the log plugin (CLI only; tests leave logging off)
    pub fn with_log(mut self) -> Self {
        self.log = true;
        self
    }

    /// Build the app with minimal plugins, the bowling resources, and the
    /// per-step system chain. The delivery pipeline runs strictly in order:
    /// release, integrate, collide, correct, settle.
    pub fn build(self) -> App {
        let mut app = App::new();

        if self.minimal_threads {
            app.add_plugins(
                MinimalPlugins
                    .set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f32(
                        1.0 / self.fps,
                    )))
                    .set(TaskPoolPlugin {
                        task_pool_options: TaskPoolOptions::with_num_threads(1),
                    }),
            );
        } else {
            app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(
                Duration::from_secs_f32(1.0 / self.fps),
            )));
        }

        if self.log {
            app.add_plugins(bevy::log::LogPlugin::default());
        }

        // Fixed clock: every update advances exactly one step, so manually
        // stepped runs are reproducible regardless of wall-clock jitter
        app.insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
            Duration::from_secs_f32(1.0 / self.fps),
        ));

        app.init_resource::<BowlingTweaks>();
        if let Err(err) =
            tuning::apply_global_tuning(&mut app.world_mut().resource_mut::<BowlingTweaks>())
        {
            warn!("using default tuning: {}", err);
        }
        if let Some(speed) = self.nominal_speed {
            app.world_mut().resource_mut::<BowlingTweaks>().nominal_speed = speed;
        }

        app.insert_resource(EventBus::new());
        app.init_resource::<PendingBowl>();
        app.init_resource::<DeliveryCounter>();
        app.init_resource::<LastDeliveryInfo>();
        app.init_resource::<DespawnSchedule>();
        app.init_resource::<BallCondition>();
        match self.seed {
            Some(seed) => app.insert_resource(DeliveryRng::seeded(seed)),
            None => app.init_resource::<DeliveryRng>(),
        };

        if self.spawn_pitch {
            app.add_systems(Startup, spawn_pitch);
        }

        app.add_systems(
            Update,
            (
                bowl_delivery,
                ball_flight_step,
                apply_velocity,
                ball_surface_response,
                flight_correction,
                ball_stop_update,
                process_despawn_timers,
                update_event_bus_time,
            )
                .chain(),
        );

        app
    }
}

impl Default for HeadlessAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_creates_app() {
        let app = HeadlessAppBuilder::new().build();
        assert!(app.world().contains_resource::<BowlingTweaks>());
        assert!(app.world().contains_resource::<EventBus>());
        assert!(app.world().contains_resource::<PendingBowl>());
    }

    #[test]
    fn test_seeded_builder_installs_rng() {
        let app = HeadlessAppBuilder::new().with_seed(99).build();
        let rng = app.world().resource::<DeliveryRng>();
        assert!(rng.0.is_some());
    }

    #[test]
    fn test_speed_override() {
        let app = HeadlessAppBuilder::new().with_nominal_speed(31.0).build();
        assert_eq!(app.world().resource::<BowlingTweaks>().nominal_speed, 31.0);
    }
}
