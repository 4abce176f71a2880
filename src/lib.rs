//! # Capacity Sched
//!
//! Per-resource task scheduling for discrete-event simulation of shared
//! processing resources.
//!
//! A simulated resource (a VM) runs several tasks at once on a capacity share
//! that changes over time: one rate per processing element, handed down by
//! the host. The engine calls the resource's scheduler whenever that share
//! changes or a previously requested event time arrives. The scheduler then
//! credits each task with the instructions it executed since the last update,
//! retires tasks that have run to completion, and tells the engine when it
//! must be called next.
//!
//! ## Key Features
//!
//! - **Exact completion**: progress is kept in integral instruction units, so a
//!   task finishes in the update where its remaining length reaches zero
//! - **Pluggable policies**: allocation (dynamic workload, time-shared,
//!   space-shared, hybrid) and finish estimation are strategies chosen per
//!   scheduler, statically dispatched
//! - **Engine-safe event times**: projections closer than the engine's minimum
//!   gap are pushed out to it, so the next event is always in the future
//! - **Completion sinks**: finished tasks go to a closure, a bounded in-memory
//!   log, or a log shared between resources
//!
//! ## Example
//!
//! ```rust
//! use capacity_sched::core::{
//!     CapacityScheduler, InMemoryCompletionLog, NextEvent, RemainingOverRate,
//!     SchedulerSettings, Task, TimeSharedAllocator,
//! };
//!
//! let settings = SchedulerSettings {
//!     min_time_between_events: 0.01,
//!     instruction_scale: 1_000_000.0,
//!     mips: 1.0,
//!     pes: 2,
//!     resource_id: 0,
//! };
//! let mut sched = CapacityScheduler::new(TimeSharedAllocator, RemainingOverRate, settings)?;
//! sched.submit(Task::new(1, 500_000), 0.0)?;
//! sched.submit(Task::new(2, 2_000_000), 0.0)?;
//!
//! let mut log = InMemoryCompletionLog::new(16);
//! let next = sched.advance(0.5, &[1.0, 1.0], &mut log)?;
//!
//! assert_eq!(log.len(), 1);
//! assert_eq!(sched.active()[0].remaining(), 1_500_000);
//! assert!(matches!(next, NextEvent::At(t) if t >= 0.5 + 0.01));
//! # Ok::<(), capacity_sched::core::SchedulerError>(())
//! ```
//!
//! Schedulers can also be built from configuration, see
//! [`builders::build_scheduler`] and [`config::SchedulerConfig::from_env`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions and capacity accounting.
pub mod core;
/// Configuration models for schedulers.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Single-resource driver loop and result reporting.
pub mod runtime;
/// Shared utilities.
pub mod util;
