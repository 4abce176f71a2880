//! Tests for completion sinks

use capacity_sched::builders::build_scheduler;
use capacity_sched::config::SchedulerConfig;
use capacity_sched::core::{
    CompletionSink, ExecutionStatus, FinishedTask, PolicyAllocator, SharedCompletionLog, Task,
};

fn config(resource_id: u32) -> SchedulerConfig {
    SchedulerConfig {
        policy: PolicyAllocator::TimeShared,
        mips: 1.0,
        pes: 1,
        resource_id,
        ..SchedulerConfig::default()
    }
}

#[test]
fn test_shared_log_collects_from_several_resources() {
    let log = SharedCompletionLog::new(16);
    let mut a = build_scheduler(&config(0)).unwrap();
    let mut b = build_scheduler(&config(1)).unwrap();
    a.submit(Task::new(1, 1_000_000), 0.0).unwrap();
    b.submit(Task::new(2, 2_000_000), 0.0).unwrap();

    let mut sink = log.clone();
    a.advance(2.0, &[1.0], &mut sink).unwrap();
    b.advance(2.0, &[1.0], &mut sink).unwrap();

    let finished = log.finished();
    assert_eq!(finished.len(), 2);
    assert_eq!(finished[0].resource_id, 0);
    assert_eq!(finished[1].resource_id, 1);
    assert!(finished.iter().all(|f| f.status == ExecutionStatus::Finished));
    assert!(finished.iter().all(|f| f.finish_time == 2.0));
}

#[test]
fn test_dyn_sink() {
    let mut sched = build_scheduler(&config(0)).unwrap();
    sched.submit(Task::new(1, 1_000_000), 0.0).unwrap();

    let mut shared = SharedCompletionLog::new(4);
    let sink: &mut dyn CompletionSink = &mut shared;
    sched.advance(1.0, &[1.0], sink).unwrap();
    assert_eq!(shared.finished().len(), 1);
}

#[test]
fn test_finished_task_serializes() {
    let report = FinishedTask {
        task_id: 1,
        resource_id: 2,
        status: ExecutionStatus::Finished,
        start_time: 0.0,
        finish_time: 1.5,
        executed: 1_500_000,
    };
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"status\":\"finished\""));
    let back: FinishedTask = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
