// src/poller/hung.rs

//! Hung-job detection.
//!
//! A job that has been running for a while but has used almost no CPU is
//! assumed to be stalled and is deleted with `qdel`.

use tracing::{debug, info, warn};

use crate::config::HungJobThresholds;
use crate::errors::Result;
use crate::scheduler::{SchedulerBackend, SchedulerCommand};
use crate::status::{AccountingUsageLine, find_usage_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HungVerdict {
    /// No `usage` line in the output; nothing to judge.
    NoUsage,
    /// Wallclock below the minimum; too early to judge.
    TooEarly,
    /// CPU ratio at or above the threshold.
    Healthy,
    /// CPU ratio below the threshold. From [`HungJobDetector::check`] this
    /// also means `qdel` was issued.
    Hung,
}

impl HungVerdict {
    pub fn is_hung(self) -> bool {
        matches!(self, HungVerdict::Hung)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HungJobDetector {
    thresholds: HungJobThresholds,
}

impl HungJobDetector {
    pub fn new(thresholds: HungJobThresholds) -> Self {
        Self { thresholds }
    }

    /// Judge the first `usage` line of `output` without side effects.
    pub fn assess(&self, output: &str) -> HungVerdict {
        let Some(line) = find_usage_line(output) else {
            return HungVerdict::NoUsage;
        };
        self.assess_usage(&AccountingUsageLine::parse(line))
    }

    pub fn assess_usage(&self, usage: &AccountingUsageLine) -> HungVerdict {
        if usage.wallclock_secs < self.thresholds.min_wallclock_secs() {
            return HungVerdict::TooEarly;
        }
        match usage.cpu_ratio() {
            None => HungVerdict::TooEarly,
            Some(ratio) if ratio < self.thresholds.cpu_hung_max_ratio => HungVerdict::Hung,
            Some(_) => HungVerdict::Healthy,
        }
    }

    /// Assess `output` and, if the job looks hung, delete it.
    ///
    /// A `qdel` that exits non-zero is logged; the verdict is still `Hung`.
    /// Only a failure to launch `qdel` is an error.
    pub async fn check<B>(&self, backend: &B, job_id: u64, output: &str) -> Result<HungVerdict>
    where
        B: SchedulerBackend + ?Sized,
    {
        let verdict = self.assess(output);
        debug!(job_id, ?verdict, "hung-job assessment");

        if verdict.is_hung() {
            info!(
                job_id,
                min_minutes = self.thresholds.cpu_hung_min_time,
                max_ratio = self.thresholds.cpu_hung_max_ratio,
                "job looks hung; deleting"
            );
            let out = backend.run(SchedulerCommand::Delete(job_id)).await?;
            if !out.success() {
                warn!(
                    job_id,
                    exit_code = out.exit_code,
                    error = %out.stderr_text(),
                    "qdel for hung job exited with non zero code"
                );
            }
        }

        Ok(verdict)
    }
}
