#![allow(dead_code)]

use std::time::Duration;

use gridpoll::config::{ClusterConfig, HungSection, RawClusterConfig, SchedulerCommands};

/// Builder for `ClusterConfig` to simplify test setup.
///
/// Starts from the defaults but with no waiting between tries, so tests
/// never sleep unless they ask to.
pub struct ClusterConfigBuilder {
    config: RawClusterConfig,
}

impl ClusterConfigBuilder {
    pub fn new() -> Self {
        let mut config = RawClusterConfig::default();
        config.default.wait_between_tries = 0.0;
        Self { config }
    }

    pub fn max_status_checks(mut self, n: u32) -> Self {
        self.config.default.max_status_checks = n;
        self
    }

    pub fn wait_between_tries(mut self, wait: Duration) -> Self {
        self.config.default.wait_between_tries = wait.as_secs_f64();
        self
    }

    pub fn log_status_checks(mut self, val: bool) -> Self {
        self.config.default.log_status_checks = val;
        self
    }

    pub fn log_fallback(mut self, val: bool) -> Self {
        self.config.default.log_fallback = val;
        self
    }

    pub fn hung(mut self, min_minutes: u64, max_ratio: f64) -> Self {
        self.config.hung = Some(HungSection {
            cpu_hung_min_time: min_minutes,
            cpu_hung_max_ratio: max_ratio,
        });
        self
    }

    pub fn commands(mut self, commands: SchedulerCommands) -> Self {
        self.config.commands = commands;
        self
    }

    pub fn build(self) -> ClusterConfig {
        ClusterConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ClusterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
