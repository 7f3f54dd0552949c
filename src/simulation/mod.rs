//! Simulation module - headless delivery runs for accuracy measurement
//!
//! Provides tools to run the bowling machine without rendering, collecting
//! landing accuracy metrics across many deliveries.

pub mod app_builder;
pub mod runner;

pub use app_builder::HeadlessAppBuilder;
pub use runner::{DeliveryStats, RunConfig, run_deliveries};
