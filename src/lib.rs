// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod poller;
pub mod scheduler;
pub mod status;
pub mod types;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::load_or_default;
use crate::errors::Result;
use crate::poller::StatusPoller;
use crate::scheduler::RealSchedulerBackend;
use crate::status::CanonicalStatus;
use crate::types::JobHandle;

/// High-level entry point used by `main.rs`.
///
/// Loads the cluster profile, polls the job through the real Grid Engine
/// binaries and returns the final status (`None` if the check budget ran
/// out first).
pub async fn run(args: CliArgs) -> Result<Option<CanonicalStatus>> {
    let cfg = load_or_default(&args.config)?;
    debug!(?cfg, "loaded cluster config");

    let job = JobHandle::new(args.job_id, &args.output_log);
    let backend = RealSchedulerBackend::new(cfg.commands.clone());
    let poller = StatusPoller::from_cluster_config(job, &cfg, backend);

    poller.poll().await
}
