//! Scheduler configuration structures.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, PolicyAllocator, SchedulerSettings};
use crate::util::serde::{ResourceId, SimTime};

/// Environment variable overriding `min_time_between_events`.
pub const ENV_MIN_TIME_BETWEEN_EVENTS: &str = "CAPSCHED_MIN_TIME_BETWEEN_EVENTS";
/// Environment variable overriding `instruction_scale`.
pub const ENV_INSTRUCTION_SCALE: &str = "CAPSCHED_INSTRUCTION_SCALE";
/// Environment variable overriding `policy`.
pub const ENV_POLICY: &str = "CAPSCHED_POLICY";
/// Environment variable overriding `mips`.
pub const ENV_MIPS: &str = "CAPSCHED_MIPS";
/// Environment variable overriding `pes`.
pub const ENV_PES: &str = "CAPSCHED_PES";
/// Environment variable overriding `resource_id`.
pub const ENV_RESOURCE_ID: &str = "CAPSCHED_RESOURCE_ID";

/// Configuration of one resource's scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Smallest gap between two scheduled events.
    pub min_time_between_events: SimTime,
    /// Instruction units per unit of capacity × time.
    pub instruction_scale: f64,
    /// Allocation policy.
    pub policy: PolicyAllocator,
    /// Rate of one processing element.
    pub mips: f64,
    /// Number of processing elements.
    pub pes: u32,
    /// Resource identifier reported with finished tasks.
    pub resource_id: ResourceId,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let settings = SchedulerSettings::default();
        Self {
            min_time_between_events: settings.min_time_between_events,
            instruction_scale: settings.instruction_scale,
            policy: PolicyAllocator::default(),
            mips: settings.mips,
            pes: settings.pes,
            resource_id: settings.resource_id,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_time_between_events.is_finite() && self.min_time_between_events > 0.0) {
            return Err("min_time_between_events must be greater than 0".into());
        }
        if !(self.instruction_scale.is_finite() && self.instruction_scale > 0.0) {
            return Err("instruction_scale must be greater than 0".into());
        }
        if !(self.mips.is_finite() && self.mips > 0.0) {
            return Err("mips must be greater than 0".into());
        }
        if self.pes == 0 {
            return Err("pes must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `CAPSCHED_*` variables from the process
    /// environment, after loading a `.env` file if one exists.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by environment variable name, then validate.
    pub fn with_overrides<F>(mut self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_MIN_TIME_BETWEEN_EVENTS) {
            self.min_time_between_events = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MIN_TIME_BETWEEN_EVENTS}={v}"))?;
        }
        if let Some(v) = lookup(ENV_INSTRUCTION_SCALE) {
            self.instruction_scale = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_INSTRUCTION_SCALE}={v}"))?;
        }
        if let Some(v) = lookup(ENV_POLICY) {
            self.policy = parse_policy(&v).map_err(anyhow::Error::msg)?;
        }
        if let Some(v) = lookup(ENV_MIPS) {
            self.mips = v.trim().parse().with_context(|| format!("{ENV_MIPS}={v}"))?;
        }
        if let Some(v) = lookup(ENV_PES) {
            self.pes = v.trim().parse().with_context(|| format!("{ENV_PES}={v}"))?;
        }
        if let Some(v) = lookup(ENV_RESOURCE_ID) {
            self.resource_id = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_RESOURCE_ID}={v}"))?;
        }
        self.validate().map_err(anyhow::Error::msg)?;
        Ok(self)
    }
}

impl From<&SchedulerConfig> for SchedulerSettings {
    fn from(cfg: &SchedulerConfig) -> Self {
        Self {
            min_time_between_events: cfg.min_time_between_events,
            instruction_scale: cfg.instruction_scale,
            mips: cfg.mips,
            pes: cfg.pes,
            resource_id: cfg.resource_id,
        }
    }
}

/// Parse a policy by name (`time_shared`) or by legacy number
/// (1 dynamic workload, 2 time shared, 3 space shared, 4 hybrid).
pub fn parse_policy(input: &str) -> Result<PolicyAllocator, String> {
    match input.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "1" | "dynamic_workload" => Ok(PolicyAllocator::DynamicWorkload),
        "2" | "time_shared" => Ok(PolicyAllocator::TimeShared),
        "3" | "space_shared" => Ok(PolicyAllocator::SpaceShared),
        "4" | "hybrid" => Ok(PolicyAllocator::Hybrid),
        other => Err(format!("unknown scheduling policy `{other}`")),
    }
}
