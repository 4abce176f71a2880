//! Builders to construct schedulers from configuration.

pub mod scheduler_builder;

pub use scheduler_builder::{build_scheduler, build_schedulers, ConfiguredScheduler};
