//! Task descriptions and the execution records the scheduler keeps for them.

use serde::{Deserialize, Serialize};

use crate::util::serde::{ResourceId, SimTime, TaskId};

/// How much of the granted capacity a task actually uses over time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum UtilizationModel {
    /// Always uses all of its allocation.
    #[default]
    Full,
    /// Uses a constant fraction, clamped into `[0, 1]`.
    Fixed(f64),
    /// Never uses any capacity.
    Null,
}

impl UtilizationModel {
    /// Utilization fraction at `time`, always within `[0, 1]`.
    pub fn utilization(&self, _time: SimTime) -> f64 {
        match *self {
            Self::Full => 1.0,
            Self::Fixed(fraction) if fraction.is_finite() => fraction.clamp(0.0, 1.0),
            Self::Fixed(_) | Self::Null => 0.0,
        }
    }
}

/// Immutable description of a unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Total length in stored instruction units.
    pub length: u64,
    /// Processing elements requested.
    #[serde(default = "default_pes")]
    pub pes: u32,
    /// Input file size in bytes.
    #[serde(default)]
    pub file_size: u64,
    /// Output size in bytes.
    #[serde(default)]
    pub output_size: u64,
    /// CPU utilization model.
    #[serde(default)]
    pub utilization: UtilizationModel,
}

const fn default_pes() -> u32 {
    1
}

impl Task {
    /// Create a single-PE task with full utilization and no I/O.
    pub const fn new(id: TaskId, length: u64) -> Self {
        Self {
            id,
            length,
            pes: 1,
            file_size: 0,
            output_size: 0,
            utilization: UtilizationModel::Full,
        }
    }

    /// Set the number of processing elements requested.
    pub const fn with_pes(mut self, pes: u32) -> Self {
        self.pes = pes;
        self
    }

    /// Set input and output sizes.
    pub const fn with_io_sizes(mut self, file_size: u64, output_size: u64) -> Self {
        self.file_size = file_size;
        self.output_size = output_size;
        self
    }

    /// Set the CPU utilization model.
    pub const fn with_utilization(mut self, utilization: UtilizationModel) -> Self {
        self.utilization = utilization;
        self
    }
}

/// Lifecycle of a task on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Occupying the resource and making progress.
    Active,
    /// All instructions executed.
    Finished,
}

/// Runtime progress of a task while it occupies a resource.
///
/// `executed` never exceeds the task length, so `remaining()` hits exactly
/// zero on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    task: Task,
    resource_id: ResourceId,
    executed: u64,
    start_time: SimTime,
    finish_time: Option<SimTime>,
    status: ExecutionStatus,
}

impl ExecutionRecord {
    pub(crate) const fn new(task: Task, resource_id: ResourceId, start_time: SimTime) -> Self {
        Self {
            task,
            resource_id,
            executed: 0,
            start_time,
            finish_time: None,
            status: ExecutionStatus::Active,
        }
    }

    /// Task being executed.
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Task identifier.
    pub const fn id(&self) -> TaskId {
        self.task.id
    }

    /// Resource the task runs on.
    pub const fn resource_id(&self) -> ResourceId {
        self.resource_id
    }

    /// Instruction units executed so far.
    pub const fn executed(&self) -> u64 {
        self.executed
    }

    /// Instruction units left.
    pub const fn remaining(&self) -> u64 {
        self.task.length.saturating_sub(self.executed)
    }

    /// Time the task was admitted.
    pub const fn start_time(&self) -> SimTime {
        self.start_time
    }

    /// Time the task finished, once it has.
    pub const fn finish_time(&self) -> Option<SimTime> {
        self.finish_time
    }

    /// Current lifecycle status.
    pub const fn status(&self) -> ExecutionStatus {
        self.status
    }

    /// Whether every instruction has been executed.
    pub const fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Credit `units` of progress and return how many were applied.
    pub(crate) fn record_progress(&mut self, units: u64) -> u64 {
        let applied = units.min(self.remaining());
        self.executed += applied;
        applied
    }

    pub(crate) fn finish(&mut self, time: SimTime) {
        debug_assert!(self.is_complete(), "task {} finished early", self.task.id);
        self.status = ExecutionStatus::Finished;
        self.finish_time = Some(time);
    }
}
