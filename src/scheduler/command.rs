// src/scheduler/command.rs

//! The three scheduler invocations the poller needs, and what they return.

use std::fmt;

use crate::config::SchedulerCommands;

/// One scheduler invocation for a given job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerCommand {
    /// `qstat -j <id>`: live-queue job details.
    Detail(u64),
    /// `qacct -j <id>`: accounting record of a job that left the queue.
    Accounting(u64),
    /// `qdel <id>`: terminate the job.
    Delete(u64),
}

impl SchedulerCommand {
    pub fn job_id(&self) -> u64 {
        match *self {
            SchedulerCommand::Detail(id)
            | SchedulerCommand::Accounting(id)
            | SchedulerCommand::Delete(id) => id,
        }
    }

    /// Short tool name used in log messages.
    pub fn tool(&self) -> &'static str {
        match self {
            SchedulerCommand::Detail(_) => "qstat",
            SchedulerCommand::Accounting(_) => "qacct",
            SchedulerCommand::Delete(_) => "qdel",
        }
    }

    /// Program and argument vector, resolved against the configured
    /// executables.
    pub fn argv(&self, commands: &SchedulerCommands) -> (String, Vec<String>) {
        match *self {
            SchedulerCommand::Detail(id) => {
                (commands.qstat.clone(), vec!["-j".to_string(), id.to_string()])
            }
            SchedulerCommand::Accounting(id) => {
                (commands.qacct.clone(), vec!["-j".to_string(), id.to_string()])
            }
            SchedulerCommand::Delete(id) => (commands.qdel.clone(), vec![id.to_string()]),
        }
    }
}

impl fmt::Display for SchedulerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerCommand::Delete(id) => write!(f, "{} {}", self.tool(), id),
            _ => write!(f, "{} -j {}", self.tool(), self.job_id()),
        }
    }
}

/// Exit code plus captured output of a finished scheduler command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn new(exit_code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Decoded and trimmed stdout.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim().to_string()
    }

    /// Decoded and trimmed stderr.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_uses_configured_executables() {
        let commands = SchedulerCommands {
            qstat: "/opt/sge/bin/qstat".to_string(),
            ..SchedulerCommands::default()
        };

        let (prog, args) = SchedulerCommand::Detail(7).argv(&commands);
        assert_eq!(prog, "/opt/sge/bin/qstat");
        assert_eq!(args, vec!["-j", "7"]);

        let (prog, args) = SchedulerCommand::Accounting(7).argv(&commands);
        assert_eq!(prog, "qacct");
        assert_eq!(args, vec!["-j", "7"]);

        let (prog, args) = SchedulerCommand::Delete(7).argv(&commands);
        assert_eq!(prog, "qdel");
        assert_eq!(args, vec!["7"]);
    }

    #[test]
    fn display_reads_like_a_command_line() {
        assert_eq!(SchedulerCommand::Detail(12).to_string(), "qstat -j 12");
        assert_eq!(SchedulerCommand::Delete(12).to_string(), "qdel 12");
    }

    #[test]
    fn output_text_is_trimmed_and_lossy() {
        let out = CommandOutput::new(1, b"  job_state r \n".to_vec(), vec![0xff, b'x']);
        assert!(!out.success());
        assert_eq!(out.stdout_text(), "job_state r");
        assert_eq!(out.stderr_text(), "\u{fffd}x");
    }
}
