//! Ball-related components

use bevy::prelude::*;

use crate::constants::BALLS_PER_OVER;

/// Marker for ball entities
#[derive(Component)]
pub struct Ball;

/// Linear velocity in meters per second
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct Velocity(pub Vec3);

/// Angular velocity in radians per second
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct AngularVelocity(pub Vec3);

/// Per-flight state for one delivery's ball
#[derive(Component, Debug, Clone)]
pub struct BallFlight {
    /// True once the ball has pitched (terminal for the aim phase)
    pub has_landed: bool,
    /// True while the ball is rolling along the ground
    pub rolling: bool,
    /// True once the ball has come to rest
    pub stopped: bool,
    /// True once a wicket hit has been reported
    pub wicket_hit: bool,
    pub bounce_count: u32,
    /// Flight clock, accumulated from clamped frame deltas
    pub airtime: f32,
    /// Flight clock value at the last ground bounce (for rate limiting)
    pub last_ground_bounce: f32,
}

impl Default for BallFlight {
    fn default() -> Self {
        Self {
            has_landed: false,
            rolling: false,
            stopped: false,
            wicket_hit: false,
            bounce_count: 0,
            airtime: 0.0,
            last_ground_bounce: f32::NEG_INFINITY,
        }
    }
}

/// Wear state of the match ball, persisted across deliveries
#[derive(Resource, Default, Debug, Clone)]
pub struct BallCondition {
    /// Surface roughness, 0..1, monotonically non-decreasing
    pub roughness: f32,
    /// Age in overs elapsed
    pub age_overs: f32,
}

impl BallCondition {
    pub fn roughen(&mut self, amount: f32) {
        self.roughness = (self.roughness + amount).min(1.0);
    }

    pub fn advance_delivery(&mut self) {
        self.age_overs += 1.0 / BALLS_PER_OVER;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roughness_is_monotone_and_capped() {
        let mut condition = BallCondition::default();
        condition.roughen(0.4);
        condition.roughen(0.4);
        condition.roughen(0.4);
        assert_eq!(condition.roughness, 1.0);
    }

    #[test]
    fn test_age_advances_per_delivery() {
        let mut condition = BallCondition::default();
        for _ in 0..6 {
            condition.advance_delivery();
        }
        assert!((condition.age_overs - 1.0).abs() < 1e-5);
    }
}
