//! Event type definitions for delivery notifications

use serde::{Deserialize, Serialize};

/// All notifications the core emits for external consumers
/// (prediction markers, UI, analytics).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeliveryEvent {
    // === Session Events ===
    /// Session started (generated once per simulation run)
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,  // ISO 8601
    },

    // === Delivery Events ===
    /// Ball released toward a target
    BallBowled {
        delivery_id: u64,
        target: (f32, f32), // X/Z of the aim point
        launch_speed: f32,
        compensation_factor: f32,
        predicted_error: f32,
    },
    /// Ball pitched on the pitching area (hide prediction visuals)
    BallLanded {
        delivery_id: u64,
        point: (f32, f32),
        /// Distance from the aim point in the horizontal plane
        error: f32,
    },
    /// Ball struck the wicket
    WicketHit { delivery_id: u64 },
    /// Ball came to rest
    BallStopped { delivery_id: u64 },
    /// Delivery refused before release (configuration error)
    DeliveryFault { reason: String },
}
