//! Tests for utility functions

use capacity_sched::core::{Task, UtilizationModel};
use capacity_sched::util::{init_tracing, ResourceId, SimTime, TaskId};

#[test]
fn test_aliases() {
    let id: TaskId = 12345;
    let resource: ResourceId = 2;
    let time: SimTime = 0.5;
    assert_eq!(Task::new(id, 1).id, 12345);
    assert_eq!(resource, 2);
    assert_eq!(time, 0.5);
}

#[test]
fn test_task_builders() {
    let task = Task::new(1, 400_000)
        .with_pes(2)
        .with_io_sizes(300, 300)
        .with_utilization(UtilizationModel::Fixed(0.5));
    assert_eq!(task.pes, 2);
    assert_eq!(task.file_size, 300);
    assert_eq!(task.output_size, 300);
    assert_eq!(task.utilization.utilization(0.0), 0.5);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
