//! Dynamic capacity scheduler.
//!
//! Tracks the tasks running on one resource and advances their progress each
//! time the engine reports a new simulation time and capacity share. Each call
//! to [`CapacityScheduler::advance`] runs in two passes: a progress pass that
//! credits executed instructions and projects finish times for the records
//! still running, then a compaction pass that moves completed records out and
//! hands them to a [`CompletionSink`].
//!
//! # Instruction units
//!
//! Progress for one update is `time_span × capacity × instruction_scale`,
//! truncated toward zero into the integral instruction units tasks are
//! measured in. Non-positive or NaN products contribute nothing; products
//! beyond `u64::MAX` saturate. A task completes in the update where its
//! remaining length first reaches exactly zero.

use serde::{Deserialize, Serialize};

use crate::core::completion::CompletionSink;
use crate::core::error::SchedulerError;
use crate::core::policy::{AllocationContext, CapacityAllocator, FinishEstimator};
use crate::core::task::{ExecutionRecord, Task};
use crate::util::serde::{ResourceId, SimTime};

/// Values the engine supplies to a scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSettings {
    /// Smallest gap the engine schedules between two events.
    pub min_time_between_events: SimTime,
    /// Instruction units per unit of capacity × time.
    pub instruction_scale: f64,
    /// Configured rate of one processing element.
    pub mips: f64,
    /// Configured number of processing elements.
    pub pes: u32,
    /// Resource this scheduler belongs to.
    pub resource_id: ResourceId,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            min_time_between_events: 0.01,
            instruction_scale: 1_000_000.0,
            mips: 1_000.0,
            pes: 1,
            resource_id: 0,
        }
    }
}

impl SchedulerSettings {
    /// Check the values needed for the next-event guarantee.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if !(self.min_time_between_events.is_finite() && self.min_time_between_events > 0.0) {
            return Err(SchedulerError::Config(
                "min_time_between_events must be a positive number".into(),
            ));
        }
        if !(self.instruction_scale.is_finite() && self.instruction_scale > 0.0) {
            return Err(SchedulerError::Config(
                "instruction_scale must be a positive number".into(),
            ));
        }
        if !(self.mips.is_finite() && self.mips > 0.0) {
            return Err(SchedulerError::Config("mips must be a positive number".into()));
        }
        if self.pes == 0 {
            return Err(SchedulerError::Config("pes must be greater than 0".into()));
        }
        Ok(())
    }
}

/// When the scheduler needs to be invoked again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NextEvent {
    /// No active tasks; nothing to do until a task is submitted.
    Idle,
    /// Invoke again at this absolute time.
    At(SimTime),
    /// Tasks are active but none can finish at the current share.
    Stalled,
}

impl NextEvent {
    /// Value in the engine's convention: `0` for idle, `f64::MAX` for stalled.
    pub const fn engine_time(self) -> SimTime {
        match self {
            Self::Idle => 0.0,
            Self::At(time) => time,
            Self::Stalled => f64::MAX,
        }
    }

    /// Scheduled time, if any.
    pub const fn time(self) -> Option<SimTime> {
        match self {
            Self::At(time) => Some(time),
            Self::Idle | Self::Stalled => None,
        }
    }

    /// Whether the active set is empty.
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Running counters for one scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    /// Tasks admitted.
    pub submitted: u64,
    /// Tasks finished.
    pub completed: u64,
    /// Accepted `advance` calls.
    pub advances: u64,
    /// Instruction units credited across all tasks.
    pub executed_units: u64,
}

/// Instruction units earned over `time_span` at `rate`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_units(time_span: SimTime, rate: f64, instruction_scale: f64) -> u64 {
    let product = time_span * rate * instruction_scale;
    if product.is_nan() || product <= 0.0 {
        return 0;
    }
    product as u64
}

/// Scheduler for the tasks sharing one resource, configured with an
/// allocation strategy `A` and a finish estimator `E`.
#[derive(Debug, Clone)]
pub struct CapacityScheduler<A, E> {
    allocator: A,
    estimator: E,
    settings: SchedulerSettings,
    active: Vec<ExecutionRecord>,
    capacity_share: Vec<f64>,
    previous_time: SimTime,
    stats: SchedulerStats,
}

impl<A, E> CapacityScheduler<A, E>
where
    A: CapacityAllocator,
    E: FinishEstimator,
{
    /// Create an empty scheduler starting at time zero.
    pub fn new(allocator: A, estimator: E, settings: SchedulerSettings) -> Result<Self, SchedulerError> {
        settings.validate()?;
        Ok(Self {
            allocator,
            estimator,
            settings,
            active: Vec::new(),
            capacity_share: Vec::new(),
            previous_time: 0.0,
            stats: SchedulerStats::default(),
        })
    }

    /// Admit a task at `now`.
    ///
    /// The record only earns progress from `now` on, so the engine may admit
    /// a task between two updates.
    pub fn submit(&mut self, task: Task, now: SimTime) -> Result<(), SchedulerError> {
        if !now.is_finite() {
            return Err(SchedulerError::InvalidTime(now));
        }
        if now < self.previous_time {
            return Err(SchedulerError::TimeWentBackwards {
                current: now,
                previous: self.previous_time,
            });
        }
        if task.length == 0 {
            return Err(SchedulerError::InvalidTask {
                id: task.id,
                reason: "length must be greater than 0".into(),
            });
        }
        if task.pes == 0 {
            return Err(SchedulerError::InvalidTask {
                id: task.id,
                reason: "pes must be greater than 0".into(),
            });
        }
        if self.active.iter().any(|r| r.id() == task.id) {
            return Err(SchedulerError::DuplicateTask(task.id));
        }

        tracing::info!(
            task = task.id,
            resource = self.settings.resource_id,
            length = task.length,
            "task admitted at {now}"
        );
        self.active
            .push(ExecutionRecord::new(task, self.settings.resource_id, now));
        self.stats.submitted += 1;
        Ok(())
    }

    /// Advance every active task to `current_time` under `capacity_share`.
    ///
    /// Finished records are removed and handed to `sink` after all progress
    /// for this update is credited. Returns when the scheduler must be called
    /// again. A rejected call leaves the scheduler untouched.
    pub fn advance<C>(
        &mut self,
        current_time: SimTime,
        capacity_share: &[f64],
        sink: &mut C,
    ) -> Result<NextEvent, SchedulerError>
    where
        C: CompletionSink + ?Sized,
    {
        if let Err(e) = self.check_update(current_time, capacity_share) {
            tracing::warn!(resource = self.settings.resource_id, "rejected update: {e}");
            return Err(e);
        }

        self.capacity_share.clear();
        self.capacity_share.extend_from_slice(capacity_share);
        let previous_time = self.previous_time;
        let scale = self.settings.instruction_scale;

        let rates = self.allocator.allocate_all(&self.context(), previous_time);
        debug_assert_eq!(rates.len(), self.active.len());
        let mut credited = 0u64;
        for (record, rate) in self.active.iter_mut().zip(rates) {
            let since = previous_time.max(record.start_time());
            let time_span = (current_time - since).max(0.0);
            credited = credited.saturating_add(record.record_progress(progress_units(time_span, rate, scale)));
        }

        let next_event = self.project_next_event(current_time);

        let done = if self.active.iter().any(ExecutionRecord::is_complete) {
            let (done, still_active): (Vec<_>, Vec<_>) = std::mem::take(&mut self.active)
                .into_iter()
                .partition(ExecutionRecord::is_complete);
            self.active = still_active;
            done
        } else {
            Vec::new()
        };

        let finished = done.len();
        for mut record in done {
            record.finish(current_time);
            tracing::info!(
                task = record.id(),
                resource = record.resource_id(),
                "task finished at {current_time}"
            );
            sink.on_finish(record);
        }

        self.previous_time = current_time;
        self.stats.advances += 1;
        self.stats.completed += finished as u64;
        self.stats.executed_units = self.stats.executed_units.saturating_add(credited);

        let next = if self.active.is_empty() {
            NextEvent::Idle
        } else {
            next_event.map_or(NextEvent::Stalled, NextEvent::At)
        };
        tracing::debug!(
            resource = self.settings.resource_id,
            active = self.active.len(),
            finished,
            credited,
            "advanced to {current_time}, next {next:?}"
        );
        Ok(next)
    }

    /// Earliest clamped finish projection among the records that are not
    /// complete. Runs before completed records are moved out, so allocations
    /// still see the whole set this update started with.
    fn project_next_event(&self, current_time: SimTime) -> Option<SimTime> {
        let ctx = self.context();
        let rates = self.allocator.allocate_all(&ctx, current_time);
        let min_gap = self.settings.min_time_between_events;

        let mut next_event: Option<SimTime> = None;
        for (record, rate) in self.active.iter().zip(rates) {
            if record.is_complete() {
                continue;
            }
            let Some(mut estimate) = self.estimator.estimate_finish(record, rate, &ctx, current_time)
            else {
                continue;
            };
            if !estimate.is_finite() {
                continue;
            }
            if estimate - current_time < min_gap {
                estimate = current_time + min_gap;
            }
            // The gap is lost to rounding at large times.
            if estimate <= current_time {
                estimate = current_time.next_up();
            }
            next_event = Some(next_event.map_or(estimate, |earliest| earliest.min(estimate)));
        }
        next_event
    }

    fn check_update(&self, current_time: SimTime, capacity_share: &[f64]) -> Result<(), SchedulerError> {
        if !current_time.is_finite() {
            return Err(SchedulerError::InvalidTime(current_time));
        }
        if current_time < self.previous_time {
            return Err(SchedulerError::TimeWentBackwards {
                current: current_time,
                previous: self.previous_time,
            });
        }
        if capacity_share.is_empty() {
            return Err(SchedulerError::EmptyCapacityShare);
        }
        if let Some((index, &value)) = capacity_share
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v >= 0.0))
        {
            return Err(SchedulerError::InvalidCapacity { index, value });
        }
        Ok(())
    }

    fn context(&self) -> AllocationContext<'_> {
        AllocationContext {
            capacity_share: &self.capacity_share,
            active: &self.active,
            mips: self.settings.mips,
            pes: self.settings.pes,
            instruction_scale: self.settings.instruction_scale,
        }
    }
}

impl<A, E> CapacityScheduler<A, E> {
    /// Records currently occupying the resource.
    pub fn active(&self) -> &[ExecutionRecord] {
        &self.active
    }

    /// Whether no task is active.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Time of the last accepted update.
    pub const fn previous_time(&self) -> SimTime {
        self.previous_time
    }

    /// Capacity share from the last accepted update.
    pub fn capacity_share(&self) -> &[f64] {
        &self.capacity_share
    }

    /// Engine-supplied settings.
    pub const fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// Running counters.
    pub const fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    /// Allocation strategy.
    pub const fn allocator(&self) -> &A {
        &self.allocator
    }
}
