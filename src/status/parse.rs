// src/status/parse.rs

//! Pure parsers over captured `qstat -j` / `qacct -j` text.
//!
//! Nothing in here runs a process; the query layer feeds these functions the
//! decoded stdout and maps the resulting token through
//! [`canonicalize`](super::table::canonicalize).

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::table::{FAIL_TOKEN, SUCCESS_TOKEN};

/// Extract the job state token from `qstat -j <id>` output.
///
/// Uses the first line starting with `job_state`. The last two characters of
/// the trimmed line, trimmed again, recover both one-letter (`r`) and
/// two-letter (`qw`) codes regardless of column alignment. Returns an empty
/// string when there is no such line.
pub fn qstat_job_state(output: &str) -> &str {
    output
        .lines()
        .find(|line| line.starts_with("job_state"))
        .map(|line| last_chars(line.trim(), 2).trim())
        .unwrap_or("")
}

/// Synthesize `SUCCESS` or `FAIL` from `qacct -j <id>` output.
///
/// Both the `failed` flag and `exit_status` must end in `0` for a success:
/// `exit_status` carries the job's own exit code, `failed` catches jobs the
/// scheduler aborted before they ran.
pub fn qacct_job_state(output: &str) -> &'static str {
    let mut failed: Option<char> = None;
    let mut exit_status: Option<char> = None;

    for line in output.lines() {
        if failed.is_none() && line.starts_with("failed") {
            failed = line.trim().chars().last();
        }
        if exit_status.is_none() && line.starts_with("exit_status") {
            exit_status = line.trim().chars().last();
        }
        if failed.is_some() && exit_status.is_some() {
            break;
        }
    }

    match (failed, exit_status) {
        (Some('0'), Some('0')) => SUCCESS_TOKEN,
        _ => FAIL_TOKEN,
    }
}

/// Return the first `usage` line in the output, if any.
pub fn find_usage_line(output: &str) -> Option<&str> {
    output.lines().find(|line| line.starts_with("usage"))
}

static USAGE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s,])([A-Za-z_]+)=([^,\s]+)").expect("usage field pattern compiles")
});

/// Time figures from one `usage` line, in whole seconds.
///
/// The line looks like
/// `usage    1:  wallclock=00:05:10, cpu=00:00:02, mem=0.01 GBs, io=0.00`.
/// A field that is absent (or unparseable) counts as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountingUsageLine {
    pub wallclock_secs: u64,
    pub cpu_secs: u64,
}

impl AccountingUsageLine {
    pub fn parse(line: &str) -> Self {
        let mut usage = Self::default();
        for caps in USAGE_FIELD.captures_iter(line) {
            let slot = match &caps[1] {
                "wallclock" => &mut usage.wallclock_secs,
                "cpu" => &mut usage.cpu_secs,
                _ => continue,
            };
            *slot = match parse_duration_secs(&caps[2]) {
                Some(secs) => secs,
                None => {
                    warn!(field = &caps[1], value = &caps[2], "unparseable usage duration; treating as 0");
                    0
                }
            };
        }
        usage
    }

    /// CPU seconds per wallclock second, or `None` before any wallclock time
    /// has accrued.
    pub fn cpu_ratio(&self) -> Option<f64> {
        if self.wallclock_secs == 0 {
            return None;
        }
        Some(self.cpu_secs as f64 / self.wallclock_secs as f64)
    }
}

const DURATION_MULTIPLIERS: [u64; 4] = [1, 60, 60, 24];

/// Parse `[[[D:]HH:]MM:]SS` into seconds.
///
/// Components are read right to left as seconds, minutes, hours, days. Any
/// components beyond the fourth are ignored. A fractional seconds component
/// is truncated.
pub fn parse_duration_secs(text: &str) -> Option<u64> {
    let mut total: u64 = 0;
    let mut multiplier: u64 = 1;

    for (part, step) in text.trim().rsplit(':').zip(DURATION_MULTIPLIERS) {
        multiplier = multiplier.checked_mul(step)?;
        let value = parse_component(part)?;
        total = total.checked_add(value.checked_mul(multiplier)?)?;
    }

    Some(total)
}

fn parse_component(part: &str) -> Option<u64> {
    let part = part.trim();
    if let Ok(v) = part.parse::<u64>() {
        return Some(v);
    }
    match part.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v as u64),
        _ => None,
    }
}

fn last_chars(s: &str, n: usize) -> &str {
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}
