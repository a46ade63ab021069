// src/scheduler/mod.rs

//! Scheduler command execution layer.
//!
//! - [`command`] names the three Grid Engine invocations and their output.
//! - [`backend`] provides the `SchedulerBackend` trait and the process-backed
//!   `RealSchedulerBackend`.

pub mod backend;
pub mod command;

pub use backend::{RealSchedulerBackend, SchedulerBackend};
pub use command::{CommandOutput, SchedulerCommand};
