// src/poller/mod.rs

//! Status polling for one job.
//!
//! - [`core`] is the pure state machine deciding what to query next.
//! - [`query`] implements the qstat / qacct / log-tail sources.
//! - [`hung`] detects and deletes stalled jobs during qacct queries.
//!
//! [`StatusPoller`] is the async shell tying these together: it drives a
//! [`PollMachine`], performs each query against its [`SchedulerBackend`] and
//! sleeps between attempts.

pub mod core;
pub mod hung;
pub mod query;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{ClusterConfig, HungJobThresholds, PollConfig};
use crate::errors::{GridpollError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::scheduler::SchedulerBackend;
use crate::status::CanonicalStatus;
use crate::types::JobHandle;

pub use self::core::{PollMachine, PollOutcome, PollStep, QueryResult, Source};
pub use self::hung::{HungJobDetector, HungVerdict};

/// Polls one job until it reports a status or the check budget runs out.
pub struct StatusPoller<B: SchedulerBackend> {
    pub(crate) job: JobHandle,
    pub(crate) config: PollConfig,
    pub(crate) hung: Option<HungJobDetector>,
    pub(crate) backend: B,
    pub(crate) fs: Arc<dyn FileSystem>,
}

impl<B: SchedulerBackend> fmt::Debug for StatusPoller<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusPoller")
            .field("job", &self.job)
            .field("config", &self.config)
            .field("hung", &self.hung)
            .finish_non_exhaustive()
    }
}

impl<B: SchedulerBackend> StatusPoller<B> {
    /// Poller with hung-job detection off, reading logs from the real
    /// filesystem.
    pub fn new(job: JobHandle, config: PollConfig, backend: B) -> Self {
        Self {
            job,
            config,
            hung: None,
            backend,
            fs: Arc::new(RealFileSystem),
        }
    }

    /// Poller configured from a loaded cluster profile, including hung-job
    /// thresholds when the profile has them.
    pub fn from_cluster_config(job: JobHandle, config: &ClusterConfig, backend: B) -> Self {
        Self::new(job, config.poll.clone(), backend).with_hung_detection(config.hung)
    }

    pub fn with_hung_detection(mut self, thresholds: Option<HungJobThresholds>) -> Self {
        self.hung = thresholds.map(HungJobDetector::new);
        self
    }

    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn job(&self) -> &JobHandle {
        &self.job
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Poll until a status is known.
    ///
    /// Returns `Ok(None)` when `max_status_checks` iterations pass without
    /// one; the caller should treat that as "still pending". Errors from
    /// individual queries are logged and polling moves on, except
    /// [`GridpollError::UnknownStatusLine`] from the log tail, which is
    /// returned.
    pub async fn poll(&self) -> Result<Option<CanonicalStatus>> {
        let job_id = self.job.job_id();
        let mut machine = PollMachine::new(&self.config);
        let mut step = machine.start();

        loop {
            step = match step {
                PollStep::Query(source) => {
                    let result = match self.query(source).await {
                        Ok(Some(status)) => QueryResult::Found(status),
                        Ok(None) => QueryResult::Absent,
                        Err(err @ GridpollError::UnknownStatusLine { .. }) => return Err(err),
                        Err(err) => {
                            warn!(job_id, %source, error = %err, "unexpected error while checking status");
                            QueryResult::Error
                        }
                    };

                    if self.config.log_status_checks {
                        info!(
                            job_id,
                            check = machine.iteration(),
                            max = self.config.max_status_checks,
                            %source,
                            ?result,
                            "status check"
                        );
                    }

                    machine.on_result(source, result)
                }
                PollStep::Sleep(wait) => {
                    if !wait.is_zero() {
                        tokio::time::sleep(wait).await;
                    }
                    machine.on_slept()
                }
                PollStep::Finish(outcome) => {
                    debug!(job_id, ?outcome, checks = machine.iteration(), "polling finished");
                    return Ok(outcome.status());
                }
            };
        }
    }

    async fn query(&self, source: Source) -> Result<Option<CanonicalStatus>> {
        match source {
            Source::Qstat => self.query_qstat().await,
            Source::Qacct => self.query_qacct().await,
            Source::LogTail => self.query_log_status().map(Some),
        }
    }
}
