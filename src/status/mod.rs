// src/status/mod.rs

//! Status vocabulary and scheduler output parsing.
//!
//! - [`table`] holds [`CanonicalStatus`] and the token table.
//! - [`parse`] holds the pure `qstat` / `qacct` / usage-line parsers.

pub mod parse;
pub mod table;

pub use parse::{
    AccountingUsageLine, find_usage_line, parse_duration_secs, qacct_job_state, qstat_job_state,
};
pub use table::{CanonicalStatus, canonicalize};
