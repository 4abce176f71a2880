//! Error types for scheduler operations.

use thiserror::Error;

use crate::util::serde::{SimTime, TaskId};

/// Errors produced by scheduler components.
///
/// Every variant describes a broken caller contract. The engine is expected
/// to treat them as fatal rather than retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulerError {
    /// `advance` was called with a time earlier than the last update.
    #[error("time went backwards: current {current} < previous {previous}")]
    TimeWentBackwards {
        /// Time supplied by the caller.
        current: SimTime,
        /// Time of the last accepted update.
        previous: SimTime,
    },
    /// The capacity share had no processing elements.
    #[error("capacity share is empty")]
    EmptyCapacityShare,
    /// A capacity share element was negative or not finite.
    #[error("invalid capacity {value} for processing element {index}")]
    InvalidCapacity {
        /// Index of the offending processing element.
        index: usize,
        /// Value supplied for it.
        value: f64,
    },
    /// A time value was NaN or infinite.
    #[error("invalid simulation time: {0}")]
    InvalidTime(SimTime),
    /// A task with this id is already active on the resource.
    #[error("task {0} is already active")]
    DuplicateTask(TaskId),
    /// The task description cannot be executed.
    #[error("invalid task {id}: {reason}")]
    InvalidTask {
        /// Offending task.
        id: TaskId,
        /// Why it was rejected.
        reason: String,
    },
    /// Configuration failed validation.
    #[error("config invalid: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
