// src/scheduler/backend.rs

//! Pluggable scheduler backend abstraction.
//!
//! The poller talks to a `SchedulerBackend` instead of spawning processes
//! itself. Production code uses [`RealSchedulerBackend`], which runs the
//! Grid Engine binaries through `tokio::process`; tests substitute a scripted
//! fake that never touches the cluster.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::config::SchedulerCommands;
use crate::errors::Result;

use super::command::{CommandOutput, SchedulerCommand};

/// Trait abstracting how scheduler commands are executed.
pub trait SchedulerBackend: Send + Sync {
    /// Run one scheduler command to completion.
    ///
    /// A non-zero exit code is a normal `Ok` outcome; only a failure to run
    /// the command at all (missing binary, spawn error) is an `Err`.
    fn run(
        &self,
        command: SchedulerCommand,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + '_>>;
}

/// Backend that invokes the real `qstat` / `qacct` / `qdel` executables.
#[derive(Debug, Clone, Default)]
pub struct RealSchedulerBackend {
    commands: SchedulerCommands,
}

impl RealSchedulerBackend {
    pub fn new(commands: SchedulerCommands) -> Self {
        Self { commands }
    }
}

impl SchedulerBackend for RealSchedulerBackend {
    fn run(
        &self,
        command: SchedulerCommand,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + '_>> {
        let (program, args) = command.argv(&self.commands);

        Box::pin(async move {
            trace!(%command, program = %program, ?args, "running scheduler command");

            let output = Command::new(&program)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output()
                .await
                .with_context(|| format!("running scheduler command '{command}' via {program}"))?;

            let exit_code = output.status.code().unwrap_or(-1);
            debug!(%command, exit_code, "scheduler command finished");

            Ok(CommandOutput {
                exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        })
    }
}
