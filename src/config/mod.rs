//! Configuration models for schedulers.

pub mod scheduler;

pub use scheduler::{parse_policy, SchedulerConfig};
