// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `gridpoll`.
///
/// The workflow engine calls this once per status check as
/// `gridpoll <JOB_ID> <OUTPUT_LOG>` and reads one word from stdout.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gridpoll",
    version,
    about = "Report the status of a Grid Engine job: running, success or failed.",
    long_about = None
)]
pub struct CliArgs {
    /// Job id printed by `qsub`.
    #[arg(value_name = "JOB_ID")]
    pub job_id: u64,

    /// Path of the job's captured stdout.
    #[arg(value_name = "OUTPUT_LOG")]
    pub output_log: PathBuf,

    /// Path to the cluster config file (TOML). Missing file means defaults.
    #[arg(long, value_name = "PATH", default_value = "cluster.toml")]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GRIDPOLL_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_job_and_log() {
        let args = CliArgs::try_parse_from(["gridpoll", "4242", "logs/job.out"]).unwrap();
        assert_eq!(args.job_id, 4242);
        assert_eq!(args.output_log, PathBuf::from("logs/job.out"));
        assert_eq!(args.config, PathBuf::from("cluster.toml"));
        assert!(args.log_level.is_none());
    }

    #[test]
    fn options() {
        let args = CliArgs::try_parse_from([
            "gridpoll",
            "--config",
            "profile/cluster.toml",
            "--log-level",
            "debug",
            "7",
            "out.log",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("profile/cluster.toml"));
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }

    #[test]
    fn non_numeric_job_id_rejected() {
        assert!(CliArgs::try_parse_from(["gridpoll", "abc", "out.log"]).is_err());
    }
}
