//! Builders to construct schedulers from configuration.

use std::collections::HashMap;

use crate::config::SchedulerConfig;
use crate::core::{
    CapacityScheduler, PolicyAllocator, RemainingOverRate, SchedulerError, SchedulerSettings,
};

/// Scheduler whose allocation policy is chosen by configuration.
pub type ConfiguredScheduler = CapacityScheduler<PolicyAllocator, RemainingOverRate>;

/// Build a scheduler from validated configuration.
pub fn build_scheduler(cfg: &SchedulerConfig) -> Result<ConfiguredScheduler, SchedulerError> {
    cfg.validate().map_err(SchedulerError::Config)?;
    tracing::debug!(
        resource = cfg.resource_id,
        policy = ?cfg.policy,
        "building scheduler"
    );
    CapacityScheduler::new(cfg.policy, RemainingOverRate, SchedulerSettings::from(cfg))
}

/// Build one scheduler per named resource.
pub fn build_schedulers(
    cfgs: &HashMap<String, SchedulerConfig>,
) -> Result<HashMap<String, ConfiguredScheduler>, SchedulerError> {
    let mut schedulers = HashMap::with_capacity(cfgs.len());
    for (name, cfg) in cfgs {
        let scheduler = build_scheduler(cfg)
            .map_err(|e| SchedulerError::Config(format!("resource `{name}`: {e}")))?;
        schedulers.insert(name.clone(), scheduler);
    }
    Ok(schedulers)
}
