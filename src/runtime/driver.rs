//! Drive one scheduler through its own event times.
//!
//! Stands in for the discrete-event engine when a single resource runs under
//! a fixed capacity share, e.g. in tests and demos.

use anyhow::{bail, Context};

use crate::core::{
    AppResult, CapacityAllocator, CapacityScheduler, CompletionSink, FinishEstimator, NextEvent,
};
use crate::util::serde::SimTime;

/// Call `advance` at each returned event time, starting at the scheduler's
/// last update, until the resource is idle. Returns the time it went idle.
///
/// Fails if the scheduler stalls (active tasks that cannot progress) or is
/// still busy after `max_steps` updates.
pub fn drive_until_idle<A, E, C>(
    scheduler: &mut CapacityScheduler<A, E>,
    capacity_share: &[f64],
    sink: &mut C,
    max_steps: usize,
) -> AppResult<SimTime>
where
    A: CapacityAllocator,
    E: FinishEstimator,
    C: CompletionSink + ?Sized,
{
    let mut now = scheduler.previous_time();
    for step in 0..max_steps {
        let next = scheduler
            .advance(now, capacity_share, sink)
            .with_context(|| format!("advance to {now}"))?;
        match next {
            NextEvent::Idle => {
                tracing::info!(steps = step + 1, "resource idle at {now}");
                return Ok(now);
            }
            NextEvent::At(time) => now = time,
            NextEvent::Stalled => bail!(
                "scheduler stalled at {now} with {} active tasks",
                scheduler.active().len()
            ),
        }
    }
    bail!("resource still busy after {max_steps} steps (time {now})")
}
