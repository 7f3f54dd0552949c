//! Events module - delivery notification types and the event bus

mod bus;
mod types;

pub use bus::*;
pub use types::*;
