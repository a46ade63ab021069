// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{
    ClusterConfig, DefaultSection, HungJobThresholds, HungSection, PollConfig, RawClusterConfig,
    SchedulerCommands,
};
use crate::errors::{GridpollError, Result};

impl TryFrom<RawClusterConfig> for ClusterConfig {
    type Error = crate::errors::GridpollError;

    fn try_from(raw: RawClusterConfig) -> std::result::Result<Self, Self::Error> {
        let poll = validate_default_section(&raw.default)?;
        let hung = raw.hung.as_ref().map(validate_hung_section).transpose()?;
        validate_commands(&raw.commands)?;
        Ok(ClusterConfig::new_unchecked(poll, hung, raw.commands))
    }
}

fn validate_default_section(section: &DefaultSection) -> Result<PollConfig> {
    if section.max_status_checks == 0 {
        return Err(GridpollError::ConfigError(
            "[default].max_status_checks must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(PollConfig {
        max_status_checks: section.max_status_checks,
        wait_between_tries: seconds("wait_between_tries", section.wait_between_tries)?,
        log_status_checks: section.log_status_checks,
        latency_wait: seconds("latency_wait", section.latency_wait)?,
        log_fallback: section.log_fallback,
    })
}

fn seconds(field: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        GridpollError::ConfigError(format!(
            "[default].{field} must be a finite, non-negative number of seconds (got {value})"
        ))
    })
}

fn validate_hung_section(section: &HungSection) -> Result<HungJobThresholds> {
    let ratio = section.cpu_hung_max_ratio;
    if !ratio.is_finite() || ratio < 0.0 {
        return Err(GridpollError::ConfigError(format!(
            "[hung].cpu_hung_max_ratio must be a finite number >= 0 (got {ratio})"
        )));
    }

    Ok(HungJobThresholds {
        cpu_hung_min_time: section.cpu_hung_min_time,
        cpu_hung_max_ratio: ratio,
    })
}

fn validate_commands(commands: &SchedulerCommands) -> Result<()> {
    for (name, value) in [
        ("qstat", &commands.qstat),
        ("qacct", &commands.qacct),
        ("qdel", &commands.qdel),
    ] {
        if value.trim().is_empty() {
            return Err(GridpollError::ConfigError(format!(
                "[commands].{name} must not be empty"
            )));
        }
    }
    Ok(())
}
