// src/status/table.rs

//! Canonical job status and the fixed token table that feeds it.
//!
//! From `man qstat`, the job state is one of d(eletion), E(rror), h(old),
//! r(unning), R(estarted), s(uspended), S(uspended), e(N)hanced suspended,
//! (P)reempted, t(ransfering), T(hreshold) or w(aiting). Only the subset
//! below is mapped; everything else is "unknown" and callers decide what
//! that means for them.

use std::fmt;
use std::str::FromStr;

/// The only status vocabulary exposed outside the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalStatus {
    Running,
    Success,
    Failed,
}

impl CanonicalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalStatus::Running => "running",
            CanonicalStatus::Success => "success",
            CanonicalStatus::Failed => "failed",
        }
    }

    /// `Success` and `Failed` end a polling session; `Running` does not.
    pub fn is_terminal(self) -> bool {
        !matches!(self, CanonicalStatus::Running)
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "running" => Ok(CanonicalStatus::Running),
            "success" => Ok(CanonicalStatus::Success),
            "failed" => Ok(CanonicalStatus::Failed),
            other => Err(format!(
                "invalid status: {other} (expected \"running\", \"success\" or \"failed\")"
            )),
        }
    }
}

/// Synthetic token emitted by the accounting parser for a clean exit.
pub const SUCCESS_TOKEN: &str = "SUCCESS";
/// Synthetic token emitted by the accounting parser for anything else.
pub const FAIL_TOKEN: &str = "FAIL";

/// Map a raw scheduler or wrapper token to its canonical status.
///
/// Matching is exact and case-sensitive (`r` and `R` are distinct scheduler
/// states that happen to map to the same outcome).
pub fn canonicalize(token: &str) -> Option<CanonicalStatus> {
    match token {
        "r" | "x" | "t" | "s" | "R" | "qw" => Some(CanonicalStatus::Running),
        "d" | "E" => Some(CanonicalStatus::Failed),
        FAIL_TOKEN | "EXIT_STATUS: 1" => Some(CanonicalStatus::Failed),
        SUCCESS_TOKEN | "EXIT_STATUS: 0" => Some(CanonicalStatus::Success),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[(&str, CanonicalStatus)] = &[
        ("r", CanonicalStatus::Running),
        ("x", CanonicalStatus::Running),
        ("t", CanonicalStatus::Running),
        ("s", CanonicalStatus::Running),
        ("R", CanonicalStatus::Running),
        ("qw", CanonicalStatus::Running),
        ("d", CanonicalStatus::Failed),
        ("E", CanonicalStatus::Failed),
        ("FAIL", CanonicalStatus::Failed),
        ("EXIT_STATUS: 1", CanonicalStatus::Failed),
        ("SUCCESS", CanonicalStatus::Success),
        ("EXIT_STATUS: 0", CanonicalStatus::Success),
    ];

    #[test]
    fn every_table_token_maps_to_its_status() {
        for (token, expected) in TABLE {
            assert_eq!(canonicalize(token), Some(*expected), "token {token:?}");
        }
    }

    #[test]
    fn unlisted_tokens_are_unknown() {
        for token in ["", "h", "w", "S", "Eqw", "hqw", "success", "EXIT_STATUS: 2", " r"] {
            assert_eq!(canonicalize(token), None, "token {token:?}");
        }
    }

    #[test]
    fn display_and_parse_agree() {
        for status in [
            CanonicalStatus::Running,
            CanonicalStatus::Success,
            CanonicalStatus::Failed,
        ] {
            assert_eq!(status.to_string().parse::<CanonicalStatus>(), Ok(status));
        }
        assert!("pending".parse::<CanonicalStatus>().is_err());
    }

    #[test]
    fn only_running_is_non_terminal() {
        assert!(!CanonicalStatus::Running.is_terminal());
        assert!(CanonicalStatus::Success.is_terminal());
        assert!(CanonicalStatus::Failed.is_terminal());
    }
}
