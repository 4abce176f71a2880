//! Tests for configuration validation

use std::collections::HashMap;

use capacity_sched::config::{parse_policy, SchedulerConfig};
use capacity_sched::core::PolicyAllocator;

fn valid() -> SchedulerConfig {
    SchedulerConfig {
        min_time_between_events: 0.1,
        instruction_scale: 1_000_000.0,
        policy: PolicyAllocator::TimeShared,
        mips: 1000.0,
        pes: 2,
        resource_id: 0,
    }
}

#[test]
fn test_scheduler_config_validation() {
    assert!(valid().validate().is_ok());
    assert!(SchedulerConfig::default().validate().is_ok());
}

#[test]
fn test_scheduler_config_invalid_gap() {
    let mut cfg = valid();
    cfg.min_time_between_events = 0.0;
    assert!(cfg.validate().is_err());
    cfg.min_time_between_events = f64::NAN;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_scheduler_config_invalid_scale() {
    let mut cfg = valid();
    cfg.instruction_scale = -1.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_scheduler_config_invalid_pes() {
    let mut cfg = valid();
    cfg.pes = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "min_time_between_events": 0.05,
        "instruction_scale": 1000000,
        "policy": "hybrid",
        "mips": 250,
        "pes": 4,
        "resource_id": 3
    }"#;

    let cfg = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.policy, PolicyAllocator::Hybrid);
    assert_eq!(cfg.pes, 4);
    assert_eq!(cfg.resource_id, 3);
}

#[test]
fn test_scheduler_config_from_json_uses_defaults() {
    let cfg = SchedulerConfig::from_json_str(r#"{"policy": "space_shared"}"#).unwrap();
    assert_eq!(cfg.policy, PolicyAllocator::SpaceShared);
    assert_eq!(cfg.instruction_scale, 1_000_000.0);
}

#[test]
fn test_scheduler_config_from_json_rejects_invalid() {
    assert!(SchedulerConfig::from_json_str(r#"{"pes": 0}"#).is_err());
    assert!(SchedulerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_overrides_apply_on_top_of_defaults() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("CAPSCHED_POLICY", "3"),
        ("CAPSCHED_PES", " 8 "),
        ("CAPSCHED_MIN_TIME_BETWEEN_EVENTS", "0.5"),
    ]);
    let cfg = SchedulerConfig::default()
        .with_overrides(|key| env.get(key).map(|v| (*v).to_string()))
        .unwrap();

    assert_eq!(cfg.policy, PolicyAllocator::SpaceShared);
    assert_eq!(cfg.pes, 8);
    assert_eq!(cfg.min_time_between_events, 0.5);
    assert_eq!(cfg.mips, SchedulerConfig::default().mips);
}

#[test]
fn test_overrides_reject_bad_values() {
    let bad_number = SchedulerConfig::default()
        .with_overrides(|key| (key == "CAPSCHED_MIPS").then(|| "fast".to_string()));
    assert!(bad_number.is_err());

    let bad_policy = SchedulerConfig::default()
        .with_overrides(|key| (key == "CAPSCHED_POLICY").then(|| "round_robin".to_string()));
    assert!(bad_policy.is_err());

    let invalid = SchedulerConfig::default()
        .with_overrides(|key| (key == "CAPSCHED_PES").then(|| "0".to_string()));
    assert!(invalid.is_err());
}

#[test]
fn test_parse_policy_names_and_numbers() {
    assert_eq!(parse_policy("1"), Ok(PolicyAllocator::DynamicWorkload));
    assert_eq!(parse_policy("Time-Shared"), Ok(PolicyAllocator::TimeShared));
    assert_eq!(parse_policy("hybrid"), Ok(PolicyAllocator::Hybrid));
    assert!(parse_policy("5").is_err());
}
