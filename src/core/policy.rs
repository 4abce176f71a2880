//! Capacity-allocation and finish-estimation strategies.
//!
//! A [`CapacityScheduler`](crate::core::CapacityScheduler) is configured with
//! one [`CapacityAllocator`] and one [`FinishEstimator`]. Allocators translate
//! the resource's capacity share into a per-task rate; estimators project when
//! a task will finish at that rate. Both are read-only views over the
//! scheduler's state.

use serde::{Deserialize, Serialize};

use crate::core::task::ExecutionRecord;
use crate::util::serde::SimTime;

/// Read-only scheduler state handed to allocators and estimators.
#[derive(Debug, Clone, Copy)]
pub struct AllocationContext<'a> {
    /// Capacity of each processing element currently granted to the resource.
    pub capacity_share: &'a [f64],
    /// Active records, in admission order.
    pub active: &'a [ExecutionRecord],
    /// Configured rate of one processing element.
    pub mips: f64,
    /// Configured number of processing elements.
    pub pes: u32,
    /// Instruction units per unit of capacity × time.
    pub instruction_scale: f64,
}

impl AllocationContext<'_> {
    /// Sum of the capacity share.
    pub fn total_capacity(&self) -> f64 {
        self.capacity_share.iter().sum()
    }

    /// Processing elements requested by all active records.
    pub fn requested_pes(&self) -> u64 {
        self.active.iter().map(|r| u64::from(r.task().pes)).sum()
    }
}

/// Decides the capacity a task currently receives.
pub trait CapacityAllocator {
    /// Capacity allocated to `record` as of `as_of`.
    fn allocated_capacity(
        &self,
        record: &ExecutionRecord,
        ctx: &AllocationContext<'_>,
        as_of: SimTime,
    ) -> f64;

    /// Capacity for every active record, in `ctx.active` order.
    ///
    /// Override when a single pass over the active set is cheaper than one
    /// query per record.
    fn allocate_all(&self, ctx: &AllocationContext<'_>, as_of: SimTime) -> Vec<f64> {
        ctx.active
            .iter()
            .map(|record| self.allocated_capacity(record, ctx, as_of))
            .collect()
    }
}

/// Projects the absolute time at which a task will finish.
pub trait FinishEstimator {
    /// Projected finish time of `record` running at `rate`, or `None` when it
    /// cannot finish at that rate.
    fn estimate_finish(
        &self,
        record: &ExecutionRecord,
        rate: f64,
        ctx: &AllocationContext<'_>,
        current_time: SimTime,
    ) -> Option<SimTime>;
}

/// Every task gets the whole configured capacity of the resource, scaled by
/// its utilization model.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicWorkloadAllocator;

impl CapacityAllocator for DynamicWorkloadAllocator {
    fn allocated_capacity(
        &self,
        record: &ExecutionRecord,
        ctx: &AllocationContext<'_>,
        as_of: SimTime,
    ) -> f64 {
        record.task().utilization.utilization(as_of) * ctx.mips * f64::from(ctx.pes)
    }
}

/// The capacity share is split evenly per requested processing element.
///
/// While fewer PEs are requested than the share provides, each requested PE
/// runs at the average PE rate; once oversubscribed, the total is divided
/// across all requested PEs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSharedAllocator;

impl CapacityAllocator for TimeSharedAllocator {
    #[allow(clippy::cast_precision_loss)]
    fn allocated_capacity(
        &self,
        record: &ExecutionRecord,
        ctx: &AllocationContext<'_>,
        _as_of: SimTime,
    ) -> f64 {
        let divisor = ctx.requested_pes().max(ctx.capacity_share.len() as u64);
        if divisor == 0 {
            return 0.0;
        }
        ctx.total_capacity() / divisor as f64 * f64::from(record.task().pes)
    }
}

/// Tasks get dedicated processing elements in admission order. A task that
/// does not fit in the PEs left over gets nothing until earlier tasks finish.
/// Completed records hold no PEs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceSharedAllocator;

impl SpaceSharedAllocator {
    fn grant(ctx: &AllocationContext<'_>) -> Vec<f64> {
        let mut next_pe = 0usize;
        ctx.active
            .iter()
            .map(|record| {
                if record.is_complete() {
                    return 0.0;
                }
                let wanted = record.task().pes as usize;
                let end = next_pe + wanted;
                if end > ctx.capacity_share.len() {
                    return 0.0;
                }
                let rate: f64 = ctx.capacity_share[next_pe..end].iter().sum();
                next_pe = end;
                rate
            })
            .collect()
    }
}

impl CapacityAllocator for SpaceSharedAllocator {
    fn allocated_capacity(
        &self,
        record: &ExecutionRecord,
        ctx: &AllocationContext<'_>,
        _as_of: SimTime,
    ) -> f64 {
        ctx.active
            .iter()
            .position(|r| r.id() == record.id())
            .map_or(0.0, |index| Self::grant(ctx)[index])
    }

    fn allocate_all(&self, ctx: &AllocationContext<'_>, _as_of: SimTime) -> Vec<f64> {
        Self::grant(ctx)
    }
}

/// Space-shared while every requested PE fits in the capacity share,
/// time-shared once the resource is oversubscribed, so no task waits at zero
/// rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridAllocator;

impl HybridAllocator {
    fn oversubscribed(ctx: &AllocationContext<'_>) -> bool {
        ctx.requested_pes() > ctx.capacity_share.len() as u64
    }
}

impl CapacityAllocator for HybridAllocator {
    fn allocated_capacity(
        &self,
        record: &ExecutionRecord,
        ctx: &AllocationContext<'_>,
        as_of: SimTime,
    ) -> f64 {
        if Self::oversubscribed(ctx) {
            TimeSharedAllocator.allocated_capacity(record, ctx, as_of)
        } else {
            SpaceSharedAllocator.allocated_capacity(record, ctx, as_of)
        }
    }

    fn allocate_all(&self, ctx: &AllocationContext<'_>, as_of: SimTime) -> Vec<f64> {
        if Self::oversubscribed(ctx) {
            TimeSharedAllocator.allocate_all(ctx, as_of)
        } else {
            SpaceSharedAllocator.allocate_all(ctx, as_of)
        }
    }
}

/// Allocation policy selected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyAllocator {
    /// See [`DynamicWorkloadAllocator`].
    #[default]
    DynamicWorkload,
    /// See [`TimeSharedAllocator`].
    TimeShared,
    /// See [`SpaceSharedAllocator`].
    SpaceShared,
    /// See [`HybridAllocator`].
    Hybrid,
}

impl CapacityAllocator for PolicyAllocator {
    fn allocated_capacity(
        &self,
        record: &ExecutionRecord,
        ctx: &AllocationContext<'_>,
        as_of: SimTime,
    ) -> f64 {
        match self {
            Self::DynamicWorkload => DynamicWorkloadAllocator.allocated_capacity(record, ctx, as_of),
            Self::TimeShared => TimeSharedAllocator.allocated_capacity(record, ctx, as_of),
            Self::SpaceShared => SpaceSharedAllocator.allocated_capacity(record, ctx, as_of),
            Self::Hybrid => HybridAllocator.allocated_capacity(record, ctx, as_of),
        }
    }

    fn allocate_all(&self, ctx: &AllocationContext<'_>, as_of: SimTime) -> Vec<f64> {
        match self {
            Self::DynamicWorkload => DynamicWorkloadAllocator.allocate_all(ctx, as_of),
            Self::TimeShared => TimeSharedAllocator.allocate_all(ctx, as_of),
            Self::SpaceShared => SpaceSharedAllocator.allocate_all(ctx, as_of),
            Self::Hybrid => HybridAllocator.allocate_all(ctx, as_of),
        }
    }
}

/// Finish time is `max(current_time, start_time) + remaining / (rate × instruction_scale)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemainingOverRate;

impl FinishEstimator for RemainingOverRate {
    #[allow(clippy::cast_precision_loss)]
    fn estimate_finish(
        &self,
        record: &ExecutionRecord,
        rate: f64,
        ctx: &AllocationContext<'_>,
        current_time: SimTime,
    ) -> Option<SimTime> {
        let units_per_time = rate * ctx.instruction_scale;
        if !units_per_time.is_finite() || units_per_time <= 0.0 {
            return None;
        }
        let from = current_time.max(record.start_time());
        Some(from + record.remaining() as f64 / units_per_time)
    }
}
