//! Bowling module - targeting, velocity solving, flight correction, and
//! bounce response

mod bounce;
mod correction;
mod delivery;
mod solver;
mod target;

pub use bounce::*;
pub use correction::*;
pub use delivery::*;
pub use solver::*;
pub use target::*;
