//! Ball module - components and physics integration

mod components;
mod physics;

pub use components::*;
pub use physics::*;
