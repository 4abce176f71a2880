//! Tests for builders

use std::collections::HashMap;

use capacity_sched::builders::{build_scheduler, build_schedulers};
use capacity_sched::config::SchedulerConfig;
use capacity_sched::core::{InMemoryCompletionLog, NextEvent, PolicyAllocator, Task};

#[test]
fn test_build_scheduler_from_config() {
    let cfg = SchedulerConfig {
        policy: PolicyAllocator::SpaceShared,
        mips: 1.0,
        pes: 2,
        resource_id: 5,
        ..SchedulerConfig::default()
    };
    let mut sched = build_scheduler(&cfg).unwrap();
    assert_eq!(*sched.allocator(), PolicyAllocator::SpaceShared);
    assert_eq!(sched.settings().resource_id, 5);

    sched.submit(Task::new(1, 1_000_000), 0.0).unwrap();
    let mut log = InMemoryCompletionLog::new(4);
    assert_eq!(sched.advance(1.0, &[1.0, 1.0], &mut log).unwrap(), NextEvent::Idle);
    assert_eq!(log.finished()[0].resource_id, 5);
}

#[test]
fn test_build_scheduler_rejects_invalid_config() {
    let cfg = SchedulerConfig {
        mips: 0.0,
        ..SchedulerConfig::default()
    };
    assert!(build_scheduler(&cfg).is_err());
}

#[test]
fn test_build_schedulers_per_resource() {
    let mut cfgs = HashMap::new();
    cfgs.insert("vm-0".to_string(), SchedulerConfig::default());
    cfgs.insert(
        "vm-1".to_string(),
        SchedulerConfig {
            policy: PolicyAllocator::Hybrid,
            resource_id: 1,
            ..SchedulerConfig::default()
        },
    );

    let schedulers = build_schedulers(&cfgs).unwrap();
    assert_eq!(schedulers.len(), 2);
    assert_eq!(*schedulers["vm-1"].allocator(), PolicyAllocator::Hybrid);

    cfgs.insert(
        "broken".to_string(),
        SchedulerConfig {
            pes: 0,
            ..SchedulerConfig::default()
        },
    );
    let err = build_schedulers(&cfgs).unwrap_err();
    assert!(err.to_string().contains("broken"));
}
