// src/poller/query.rs

//! The three status sources.
//!
//! `qstat` and `qacct` are tolerant: scheduler-side failures (unknown job,
//! permission denied, empty output, an unrecognised state) are ordinary
//! during polling and come back as `Ok(None)` with a warning. Only a failure
//! to run the command at all is an `Err`.
//!
//! The log tail is strict: its last line is written by our own job wrapper,
//! so an unrecognised token is [`GridpollError::UnknownStatusLine`].

use tracing::{debug, warn};

use crate::errors::{GridpollError, Result};
use crate::fs::last_line;
use crate::scheduler::{CommandOutput, SchedulerBackend, SchedulerCommand};
use crate::status::{CanonicalStatus, canonicalize, qacct_job_state, qstat_job_state};

use super::StatusPoller;

impl<B: SchedulerBackend> StatusPoller<B> {
    /// Ask the live queue.
    pub async fn query_qstat(&self) -> Result<Option<CanonicalStatus>> {
        let job_id = self.job.job_id();
        let out = self.backend.run(SchedulerCommand::Detail(job_id)).await?;
        let Some(output) = usable_stdout(job_id, SchedulerCommand::Detail(job_id), &out) else {
            return Ok(None);
        };

        let token = qstat_job_state(&output);
        debug!(job_id, token, "qstat job state");

        Ok(map_token(job_id, "qstat", token))
    }

    /// Ask the accounting records. Runs hung-job detection first when
    /// configured.
    pub async fn query_qacct(&self) -> Result<Option<CanonicalStatus>> {
        let job_id = self.job.job_id();
        let out = self.backend.run(SchedulerCommand::Accounting(job_id)).await?;
        let Some(output) = usable_stdout(job_id, SchedulerCommand::Accounting(job_id), &out)
        else {
            return Ok(None);
        };

        if let Some(detector) = &self.hung {
            if let Err(err) = detector.check(&self.backend, job_id, &output).await {
                warn!(job_id, error = %err, "could not delete hung job");
            }
        }

        let token = qacct_job_state(&output);
        debug!(job_id, token, "qacct job state");

        Ok(map_token(job_id, "qacct", token))
    }

    /// Read the status token the job wrapper left as the last line of the
    /// job's output log.
    ///
    /// A missing, unreadable or empty log means the job has not written its
    /// result yet, which reads as `Running`.
    pub fn query_log_status(&self) -> Result<CanonicalStatus> {
        let job_id = self.job.job_id();
        let path = self.job.output_log_path();

        let line = match last_line(self.fs.as_ref(), path) {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!(job_id, path = %path.display(), "no status line in job log yet");
                return Ok(CanonicalStatus::Running);
            }
            Err(err) => {
                debug!(job_id, path = %path.display(), error = %err, "job log unreadable");
                return Ok(CanonicalStatus::Running);
            }
        };

        canonicalize(&line).ok_or(GridpollError::UnknownStatusLine {
            token: line,
            job_id,
        })
    }
}

/// Decoded stdout, or `None` (with a warning) for a non-zero exit or empty
/// output.
fn usable_stdout(job_id: u64, command: SchedulerCommand, out: &CommandOutput) -> Option<String> {
    let tool = command.tool();
    if !out.success() {
        warn!(
            job_id,
            exit_code = out.exit_code,
            error = %out.stderr_text(),
            "{tool} exited with non zero code"
        );
        return None;
    }

    let output = out.stdout_text();
    if output.is_empty() {
        warn!(job_id, "{tool} exited with empty stdout");
        return None;
    }
    Some(output)
}

fn map_token(job_id: u64, tool: &str, token: &str) -> Option<CanonicalStatus> {
    let status = canonicalize(token);
    if status.is_none() {
        warn!(job_id, token, "{tool} unknown job status");
    }
    status
}
