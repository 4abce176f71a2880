//! Core scheduling abstractions and capacity accounting.

pub mod completion;
pub mod error;
pub mod policy;
pub mod scheduler;
pub mod task;

pub use completion::{CompletionSink, FinishedTask, InMemoryCompletionLog, SharedCompletionLog};
pub use error::{AppResult, SchedulerError};
pub use policy::{
    AllocationContext, CapacityAllocator, DynamicWorkloadAllocator, FinishEstimator,
    HybridAllocator, PolicyAllocator, RemainingOverRate, SpaceSharedAllocator,
    TimeSharedAllocator,
};
pub use scheduler::{
    progress_units, CapacityScheduler, NextEvent, SchedulerSettings, SchedulerStats,
};
pub use task::{ExecutionRecord, ExecutionStatus, Task, UtilizationModel};
