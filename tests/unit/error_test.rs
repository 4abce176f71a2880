//! Tests for error types

use capacity_sched::core::SchedulerError;

#[test]
fn test_time_went_backwards_error() {
    let err = SchedulerError::TimeWentBackwards {
        current: 1.5,
        previous: 2.0,
    };
    assert_eq!(format!("{}", err), "time went backwards: current 1.5 < previous 2");
}

#[test]
fn test_empty_capacity_share_error() {
    let err = SchedulerError::EmptyCapacityShare;
    assert_eq!(format!("{}", err), "capacity share is empty");
}

#[test]
fn test_invalid_capacity_error() {
    let err = SchedulerError::InvalidCapacity { index: 2, value: -0.5 };
    assert_eq!(format!("{}", err), "invalid capacity -0.5 for processing element 2");
}

#[test]
fn test_duplicate_task_error() {
    let err = SchedulerError::DuplicateTask(42);
    assert_eq!(format!("{}", err), "task 42 is already active");
}

#[test]
fn test_config_error() {
    let err = SchedulerError::Config("pes must be greater than 0".to_string());
    assert_eq!(format!("{}", err), "config invalid: pes must be greater than 0");
}

#[test]
fn test_errors_convert_to_anyhow() {
    let err: anyhow::Error = SchedulerError::EmptyCapacityShare.into();
    assert!(err.downcast_ref::<SchedulerError>().is_some());
}
