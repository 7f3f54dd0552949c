//! Tunable constants for bowlsim
//!
//! All simulation values are defined here for easy tweaking.

use bevy::prelude::*;

// =============================================================================
// PITCH GEOMETRY
// =============================================================================

pub const GROUND_Y: f32 = 0.0;
pub const PITCH_WIDTH: f32 = 3.05; // Meters between the pitch side lines
pub const BALL_RADIUS: f32 = 0.036;
pub const RELEASE_HEIGHT: f32 = 2.0; // Ball release height at the bowling machine
pub const RELEASE_Z: f32 = -18.0; // Release point, batting crease at z = 0
pub const ZONE_NEAR_Z: f32 = -7.0; // Good-length band in front of the batsman
pub const ZONE_FAR_Z: f32 = -2.0;
pub const WICKET_POS: Vec3 = Vec3::new(0.0, 0.355, 0.0);
pub const WICKET_HALF_EXTENTS: Vec3 = Vec3::new(0.114, 0.355, 0.025);

// =============================================================================
// BALL PHYSICS
// =============================================================================

pub const GRAVITY: f32 = 9.81;
pub const BALL_AIR_DRAG: f32 = 0.98; // Horizontal velocity retained after 1 second in air
pub const BALL_ROLL_FRICTION: f32 = 0.6; // Horizontal velocity retained after 1 second while rolling
pub const BALL_SPIN_AIR_DECAY: f32 = 0.9; // Angular velocity retained per second airborne
pub const BOUNCE_HEIGHT_MULT: f32 = 1.0; // Ball must bounce this x its radius to keep bouncing, else rolls
pub const SEAM_SPIN_RATE: f32 = 18.0; // Backspin applied at release (rad/s)

// =============================================================================
// TARGET SELECTION
// =============================================================================

pub const TARGET_MARGIN: f32 = 0.5; // Keep aim points this far from the zone edges
pub const TARGET_SHRINK: f32 = 0.45; // Fraction of the half-extent that is sampled (40-49%)

// =============================================================================
// COMPENSATION SEARCH
// =============================================================================

pub const NOMINAL_SPEED: f32 = 25.0; // Delivery speed (m/s, ~90 km/h medium pace)
pub const MIN_VERTICAL_SPEED: f32 = 2.0; // Launch vertical speed floor (no full tosses)
pub const COMP_COARSE_MIN: f32 = 0.5;
pub const COMP_COARSE_MAX: f32 = 2.0;
pub const COMP_COARSE_STEP: f32 = 0.005;
pub const COMP_WIDE_MIN: f32 = 0.1;
pub const COMP_WIDE_MAX: f32 = 5.0;
pub const COMP_WIDE_STEP: f32 = 0.002;
pub const COMP_TOLERANCE: f32 = 0.01; // Early-exit when predicted error falls below this
pub const COMP_RETRY_THRESHOLD: f32 = 1.0; // Coarse error above this triggers the wide pass

// =============================================================================
// FLIGHT CORRECTION
// =============================================================================

pub const HEADING_BAND_MIN: f32 = 1.0; // Heading checks run inside this distance band
pub const HEADING_BAND_MAX: f32 = 5.0;
pub const HEADING_ANGLE_LIMIT: f32 = 15.0; // Degrees off target before a correction fires
pub const FINAL_APPROACH_MIN: f32 = 0.1; // Below this the ball is effectively at contact

// =============================================================================
// BOUNCE RESPONSE
// =============================================================================

pub const PITCH_ENERGY_LOSS: f32 = 0.2; // Horizontal speed fraction lost pitching
pub const PITCH_MOMENTUM_BOOST: f32 = 1.05;
pub const PITCH_MIN_FORWARD_SPEED: f32 = 14.0; // Post-pitch speed floor toward the batsman
pub const PITCH_BOUNCE_HEIGHT: f32 = 2.5; // Vertical speed leaving the pitch
pub const FLAT_BOUNCE_HEIGHT: f32 = 1.5; // Vertical speed for flat deliveries
pub const FLAT_DELIVERY_THRESHOLD: f32 = 3.0; // Incoming |vy| below this counts as flat
pub const GROUND_ENERGY_LOSS: f32 = 0.4;
pub const GROUND_MIN_SPEED: f32 = 1.0;
pub const GROUND_RESTITUTION: f32 = 0.6;
pub const GROUND_BOUNCE_HEIGHT: f32 = 1.0; // Vertical speed cap for ground bounces
pub const GROUND_BOUNCE_INTERVAL: f32 = 0.1; // Minimum seconds between ground bounces
pub const SPIN_DAMP_PER_BOUNCE: f32 = 0.8;

// =============================================================================
// DELIVERY LIFECYCLE
// =============================================================================

pub const STOP_SPEED: f32 = 0.3; // Ball counts as stopped below this speed
pub const STOP_SPIN: f32 = 0.5; // ...with angular velocity below this
pub const DESPAWN_DELAY: f32 = 3.0; // Seconds a stopped ball lingers before removal
pub const ROUGHNESS_PER_PITCH: f32 = 0.01;
pub const ROUGHNESS_PER_BOUNCE: f32 = 0.005;
pub const BALLS_PER_OVER: f32 = 6.0;

// =============================================================================
// ACCURACY BUCKETS
// =============================================================================

pub const ERROR_EXCELLENT: f32 = 0.1; // Landing error (m) for an "excellent" delivery
pub const ERROR_ACCEPTABLE: f32 = 1.0;
