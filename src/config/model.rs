// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Cluster configuration exactly as read from the TOML file.
///
/// ```toml
/// [default]
/// max_status_checks = 30
/// wait_between_tries = 1.0
/// log_status_checks = false
///
/// [hung]
/// cpu_hung_min_time = 60
/// cpu_hung_max_ratio = 0.05
///
/// [commands]
/// qstat = "/opt/sge/bin/lx-amd64/qstat"
/// ```
///
/// Every section is optional. `[__default__]` is accepted as a spelling of
/// `[default]` so existing cluster profiles carry over unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawClusterConfig {
    #[serde(default, alias = "__default__")]
    pub default: DefaultSection,

    /// Hung-job detection thresholds. Detection is off when absent.
    #[serde(default)]
    pub hung: Option<HungSection>,

    #[serde(default)]
    pub commands: SchedulerCommands,
}

/// `[default]` section: polling behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultSection {
    /// Upper bound on poll iterations before giving up with no status.
    #[serde(default = "default_max_status_checks")]
    pub max_status_checks: u32,

    /// Seconds to sleep after each unsuccessful query.
    #[serde(default = "default_wait_between_tries")]
    pub wait_between_tries: f64,

    /// Log every iteration's outcome at info level.
    #[serde(default)]
    pub log_status_checks: bool,

    /// Seconds the workflow engine waits for output files to appear.
    ///
    /// Not used by the poll loop itself; exposed for callers that share the
    /// same profile.
    #[serde(default = "default_latency_wait")]
    pub latency_wait: f64,

    /// Consult the job's output log when both qstat and qacct come up empty.
    #[serde(default)]
    pub log_fallback: bool,
}

fn default_max_status_checks() -> u32 {
    30
}

fn default_wait_between_tries() -> f64 {
    1.0
}

fn default_latency_wait() -> f64 {
    30.0
}

impl Default for DefaultSection {
    fn default() -> Self {
        Self {
            max_status_checks: default_max_status_checks(),
            wait_between_tries: default_wait_between_tries(),
            log_status_checks: false,
            latency_wait: default_latency_wait(),
            log_fallback: false,
        }
    }
}

/// `[hung]` section. Both values are required once the section exists.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HungSection {
    /// Minimum wallclock minutes before a job can be judged hung.
    pub cpu_hung_min_time: u64,

    /// A job whose cpu/wallclock ratio falls below this is killed.
    pub cpu_hung_max_ratio: f64,
}

/// `[commands]` section: scheduler executables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchedulerCommands {
    #[serde(default = "default_qstat")]
    pub qstat: String,
    #[serde(default = "default_qacct")]
    pub qacct: String,
    #[serde(default = "default_qdel")]
    pub qdel: String,
}

fn default_qstat() -> String {
    "qstat".to_string()
}

fn default_qacct() -> String {
    "qacct".to_string()
}

fn default_qdel() -> String {
    "qdel".to_string()
}

impl Default for SchedulerCommands {
    fn default() -> Self {
        Self {
            qstat: default_qstat(),
            qacct: default_qacct(),
            qdel: default_qdel(),
        }
    }
}

/// Polling parameters, fixed for the lifetime of one poller.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    pub max_status_checks: u32,
    pub wait_between_tries: Duration,
    pub log_status_checks: bool,
    pub latency_wait: Duration,
    pub log_fallback: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_status_checks: default_max_status_checks(),
            wait_between_tries: Duration::from_secs_f64(default_wait_between_tries()),
            log_status_checks: false,
            latency_wait: Duration::from_secs_f64(default_latency_wait()),
            log_fallback: false,
        }
    }
}

/// Thresholds for the hung-job detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HungJobThresholds {
    /// Minutes of wallclock time before a job is judged at all.
    pub cpu_hung_min_time: u64,
    pub cpu_hung_max_ratio: f64,
}

impl HungJobThresholds {
    pub fn min_wallclock_secs(&self) -> u64 {
        self.cpu_hung_min_time.saturating_mul(60)
    }
}

/// Validated configuration handed to the rest of the crate.
///
/// Construct via `ClusterConfig::try_from(raw)` (see `validate.rs`) or
/// [`ClusterConfig::default`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterConfig {
    pub poll: PollConfig,
    pub hung: Option<HungJobThresholds>,
    pub commands: SchedulerCommands,
}

impl ClusterConfig {
    /// Build without validation. Callers must have checked invariants.
    pub(crate) fn new_unchecked(
        poll: PollConfig,
        hung: Option<HungJobThresholds>,
        commands: SchedulerCommands,
    ) -> Self {
        Self {
            poll,
            hung,
            commands,
        }
    }
}
