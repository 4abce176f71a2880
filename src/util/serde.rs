//! Identifier and time aliases shared by the scheduler, reports, and configuration.

/// Unique task identifier, assigned by whoever builds the [`Task`](crate::core::Task).
pub type TaskId = u64;

/// Identifier of the resource (VM) that owns a scheduler.
pub type ResourceId = u32;

/// Absolute simulation time in engine units.
pub type SimTime = f64;
