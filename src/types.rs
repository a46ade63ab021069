use std::path::{Path, PathBuf};

/// Identity of a submitted job as seen by the status poller.
///
/// `job_id` is the number `qsub` printed on submission; `output_log_path` is
/// where the job wrapper writes its stdout (and, as its final line, a status
/// token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    job_id: u64,
    output_log_path: PathBuf,
}

impl JobHandle {
    pub fn new(job_id: u64, output_log_path: impl Into<PathBuf>) -> Self {
        Self {
            job_id,
            output_log_path: output_log_path.into(),
        }
    }

    pub fn job_id(&self) -> u64 {
        self.job_id
    }

    pub fn output_log_path(&self) -> &Path {
        &self.output_log_path
    }
}
