//! Tests for the driver loop and report

use capacity_sched::builders::build_scheduler;
use capacity_sched::config::SchedulerConfig;
use capacity_sched::core::{InMemoryCompletionLog, PolicyAllocator, Task};
use capacity_sched::runtime::{drive_until_idle, format_results};

#[test]
fn test_drive_and_report() {
    let cfg = SchedulerConfig {
        policy: PolicyAllocator::DynamicWorkload,
        mips: 1000.0,
        pes: 1,
        min_time_between_events: 0.1,
        ..SchedulerConfig::default()
    };
    let mut sched = build_scheduler(&cfg).unwrap();
    sched.submit(Task::new(0, 400_000_000_000), 0.1).unwrap();
    let mut log = InMemoryCompletionLog::new(4);

    let end = drive_until_idle(&mut sched, &[1000.0], &mut log, 100).unwrap();

    assert!((end - 400.1).abs() < 1e-6);
    let table = format_results(&log.finished());
    assert!(table.contains("SUCCESS"));
    assert!(table.contains("400.00"));
}
