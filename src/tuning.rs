//! Global simulation tuning settings (decoupled from the machine itself)

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::constants::*;

// Serde default functions for fields added after the first config format
fn default_heading_band_min() -> f32 {
    HEADING_BAND_MIN
}
fn default_heading_band_max() -> f32 {
    HEADING_BAND_MAX
}
fn default_heading_angle_limit() -> f32 {
    HEADING_ANGLE_LIMIT
}
fn default_final_approach_min() -> f32 {
    FINAL_APPROACH_MIN
}
fn default_pitch_momentum_boost() -> f32 {
    PITCH_MOMENTUM_BOOST
}

/// Path to global bowling tuning config
pub const BOWLING_TUNING_FILE: &str = "config/bowling_tuning.json";

/// Serializable tuning values stored in config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BowlingTuning {
    pub nominal_speed: f32,
    pub gravity: f32,
    pub air_drag: f32,
    pub roll_friction: f32,
    pub min_vertical_speed: f32,
    pub target_margin: f32,
    pub target_shrink: f32,
    pub pitch_energy_loss: f32,
    pub pitch_min_forward_speed: f32,
    pub pitch_bounce_height: f32,
    pub flat_bounce_height: f32,
    pub flat_delivery_threshold: f32,
    pub ground_energy_loss: f32,
    pub ground_min_speed: f32,
    pub ground_bounce_height: f32,
    // Correction tuning fields
    #[serde(default = "default_heading_band_min")]
    pub heading_band_min: f32,
    #[serde(default = "default_heading_band_max")]
    pub heading_band_max: f32,
    #[serde(default = "default_heading_angle_limit")]
    pub heading_angle_limit: f32,
    #[serde(default = "default_final_approach_min")]
    pub final_approach_min: f32,
    #[serde(default = "default_pitch_momentum_boost")]
    pub pitch_momentum_boost: f32,
}

impl Default for BowlingTuning {
    fn default() -> Self {
        Self {
            nominal_speed: NOMINAL_SPEED,
            gravity: GRAVITY,
            air_drag: BALL_AIR_DRAG,
            roll_friction: BALL_ROLL_FRICTION,
            min_vertical_speed: MIN_VERTICAL_SPEED,
            target_margin: TARGET_MARGIN,
            target_shrink: TARGET_SHRINK,
            pitch_energy_loss: PITCH_ENERGY_LOSS,
            pitch_min_forward_speed: PITCH_MIN_FORWARD_SPEED,
            pitch_bounce_height: PITCH_BOUNCE_HEIGHT,
            flat_bounce_height: FLAT_BOUNCE_HEIGHT,
            flat_delivery_threshold: FLAT_DELIVERY_THRESHOLD,
            ground_energy_loss: GROUND_ENERGY_LOSS,
            ground_min_speed: GROUND_MIN_SPEED,
            ground_bounce_height: GROUND_BOUNCE_HEIGHT,
            heading_band_min: default_heading_band_min(),
            heading_band_max: default_heading_band_max(),
            heading_angle_limit: default_heading_angle_limit(),
            final_approach_min: default_final_approach_min(),
            pitch_momentum_boost: default_pitch_momentum_boost(),
        }
    }
}

impl BowlingTuning {
    pub fn apply_to(&self, tweaks: &mut BowlingTweaks) {
        tweaks.nominal_speed = self.nominal_speed;
        tweaks.gravity = self.gravity;
        tweaks.air_drag = self.air_drag;
        tweaks.roll_friction = self.roll_friction;
        tweaks.min_vertical_speed = self.min_vertical_speed;
        tweaks.target_margin = self.target_margin;
        tweaks.target_shrink = self.target_shrink;
        tweaks.pitch_energy_loss = self.pitch_energy_loss;
        tweaks.pitch_min_forward_speed = self.pitch_min_forward_speed;
        tweaks.pitch_bounce_height = self.pitch_bounce_height;
        tweaks.flat_bounce_height = self.flat_bounce_height;
        tweaks.flat_delivery_threshold = self.flat_delivery_threshold;
        tweaks.ground_energy_loss = self.ground_energy_loss;
        tweaks.ground_min_speed = self.ground_min_speed;
        tweaks.ground_bounce_height = self.ground_bounce_height;
        // Correction fields
        tweaks.heading_band_min = self.heading_band_min;
        tweaks.heading_band_max = self.heading_band_max;
        tweaks.heading_angle_limit = self.heading_angle_limit;
        tweaks.final_approach_min = self.final_approach_min;
        tweaks.pitch_momentum_boost = self.pitch_momentum_boost;
    }
}

/// Runtime-adjustable bowling values for tweaking machine behavior
#[derive(Resource, Debug, Clone)]
pub struct BowlingTweaks {
    pub nominal_speed: f32,
    pub gravity: f32,
    pub air_drag: f32,
    pub roll_friction: f32,
    pub min_vertical_speed: f32,
    pub target_margin: f32,
    pub target_shrink: f32,
    pub pitch_energy_loss: f32,
    pub pitch_min_forward_speed: f32,
    pub pitch_bounce_height: f32,
    pub flat_bounce_height: f32,
    pub flat_delivery_threshold: f32,
    pub ground_energy_loss: f32,
    pub ground_min_speed: f32,
    pub ground_bounce_height: f32,
    // Correction tuning fields
    pub heading_band_min: f32,
    pub heading_band_max: f32,
    pub heading_angle_limit: f32,
    pub final_approach_min: f32,
    pub pitch_momentum_boost: f32,
}

impl Default for BowlingTweaks {
    fn default() -> Self {
        let defaults = BowlingTuning::default();
        Self {
            nominal_speed: defaults.nominal_speed,
            gravity: defaults.gravity,
            air_drag: defaults.air_drag,
            roll_friction: defaults.roll_friction,
            min_vertical_speed: defaults.min_vertical_speed,
            target_margin: defaults.target_margin,
            target_shrink: defaults.target_shrink,
            pitch_energy_loss: defaults.pitch_energy_loss,
            pitch_min_forward_speed: defaults.pitch_min_forward_speed,
            pitch_bounce_height: defaults.pitch_bounce_height,
            flat_bounce_height: defaults.flat_bounce_height,
            flat_delivery_threshold: defaults.flat_delivery_threshold,
            ground_energy_loss: defaults.ground_energy_loss,
            ground_min_speed: defaults.ground_min_speed,
            ground_bounce_height: defaults.ground_bounce_height,
            heading_band_min: defaults.heading_band_min,
            heading_band_max: defaults.heading_band_max,
            heading_angle_limit: defaults.heading_angle_limit,
            final_approach_min: defaults.final_approach_min,
            pitch_momentum_boost: defaults.pitch_momentum_boost,
        }
    }
}

pub fn load_bowling_tuning_from_file(path: &str) -> Result<BowlingTuning, String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
}

pub fn apply_global_tuning(tweaks: &mut BowlingTweaks) -> Result<(), String> {
    match load_bowling_tuning_from_file(BOWLING_TUNING_FILE) {
        Ok(tuning) => {
            tuning.apply_to(tweaks);
            Ok(())
        }
        Err(err) => {
            BowlingTuning::default().apply_to(tweaks);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuning_applies_to_tweaks() {
        let mut tuning = BowlingTuning::default();
        tuning.nominal_speed = 32.0;
        tuning.pitch_energy_loss = 0.3;

        let mut tweaks = BowlingTweaks::default();
        tuning.apply_to(&mut tweaks);
        assert_eq!(tweaks.nominal_speed, 32.0);
        assert_eq!(tweaks.pitch_energy_loss, 0.3);
    }

    #[test]
    fn test_config_missing_correction_fields_uses_defaults() {
        // Old config files predate the correction fields
        let json = serde_json::to_string(&BowlingTuning::default()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value.as_object_mut().unwrap().remove("heading_angle_limit");
        let parsed: BowlingTuning = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.heading_angle_limit, HEADING_ANGLE_LIMIT);
    }
}
