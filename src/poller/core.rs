// src/poller/core.rs

//! Pure polling state machine.
//!
//! [`PollMachine`] decides *what to do next* (query a source, sleep, stop)
//! from the result of the previous step. It performs no IO, owns no
//! backend, and never sleeps; [`StatusPoller`](super::StatusPoller) is the
//! async shell that carries out each [`PollStep`].
//!
//! One iteration is `qstat → sleep → qacct → sleep [→ log tail]`. A status
//! from qstat or qacct ends the session immediately. An error in any step
//! abandons the rest of that iteration. After `max_status_checks`
//! iterations without a status the session ends as [`PollOutcome::Exhausted`].

use std::fmt;
use std::time::Duration;

use crate::config::PollConfig;
use crate::status::CanonicalStatus;

/// Where a status can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Qstat,
    Qacct,
    LogTail,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::Qstat => "qstat",
            Source::Qacct => "qacct",
            Source::LogTail => "log tail",
        })
    }
}

/// What a single query produced, as far as the machine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryResult {
    Found(CanonicalStatus),
    Absent,
    /// The query failed unexpectedly; the iteration is abandoned.
    Error,
}

/// How a polling session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Status(CanonicalStatus),
    Exhausted,
}

impl PollOutcome {
    pub fn status(self) -> Option<CanonicalStatus> {
        match self {
            PollOutcome::Status(s) => Some(s),
            PollOutcome::Exhausted => None,
        }
    }
}

/// Instruction for the IO shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    Query(Source),
    Sleep(Duration),
    Finish(PollOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Querying(Source),
    SleepingAfter(Source),
    Done(PollOutcome),
}

#[derive(Debug, Clone)]
pub struct PollMachine {
    max_status_checks: u32,
    wait_between_tries: Duration,
    log_fallback: bool,
    iteration: u32,
    phase: Phase,
}

impl PollMachine {
    pub fn new(config: &PollConfig) -> Self {
        Self {
            max_status_checks: config.max_status_checks,
            wait_between_tries: config.wait_between_tries,
            log_fallback: config.log_fallback,
            iteration: 0,
            phase: Phase::NotStarted,
        }
    }

    /// Iterations started so far (1-based once polling began).
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    /// First step of the session.
    pub fn start(&mut self) -> PollStep {
        match self.phase {
            Phase::NotStarted => self.begin_iteration(),
            _ => self.current_step(),
        }
    }

    /// Feed back the result of the `Query(source)` step just performed.
    pub fn on_result(&mut self, source: Source, result: QueryResult) -> PollStep {
        if self.phase != Phase::Querying(source) {
            return self.current_step();
        }

        match (source, result) {
            (Source::LogTail, QueryResult::Found(status)) if status.is_terminal() => {
                self.finish(PollOutcome::Status(status))
            }
            (Source::LogTail, QueryResult::Found(_) | QueryResult::Absent) => {
                self.begin_iteration()
            }
            (_, QueryResult::Found(status)) => self.finish(PollOutcome::Status(status)),
            (_, QueryResult::Error) => self.begin_iteration(),
            (_, QueryResult::Absent) => {
                self.phase = Phase::SleepingAfter(source);
                PollStep::Sleep(self.wait_between_tries)
            }
        }
    }

    /// Feed back completion of a `Sleep` step.
    pub fn on_slept(&mut self) -> PollStep {
        match self.phase {
            Phase::SleepingAfter(Source::Qstat) => self.query(Source::Qacct),
            Phase::SleepingAfter(Source::Qacct) if self.log_fallback => {
                self.query(Source::LogTail)
            }
            Phase::SleepingAfter(_) => self.begin_iteration(),
            _ => self.current_step(),
        }
    }

    fn begin_iteration(&mut self) -> PollStep {
        if self.iteration >= self.max_status_checks {
            return self.finish(PollOutcome::Exhausted);
        }
        self.iteration += 1;
        self.query(Source::Qstat)
    }

    fn query(&mut self, source: Source) -> PollStep {
        self.phase = Phase::Querying(source);
        PollStep::Query(source)
    }

    fn finish(&mut self, outcome: PollOutcome) -> PollStep {
        self.phase = Phase::Done(outcome);
        PollStep::Finish(outcome)
    }

    /// Re-issue the pending step; used when fed an out-of-order event.
    fn current_step(&self) -> PollStep {
        match self.phase {
            Phase::NotStarted | Phase::Querying(Source::Qstat) => PollStep::Query(Source::Qstat),
            Phase::Querying(source) => PollStep::Query(source),
            Phase::SleepingAfter(_) => PollStep::Sleep(self.wait_between_tries),
            Phase::Done(outcome) => PollStep::Finish(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max: u32, log_fallback: bool) -> PollConfig {
        PollConfig {
            max_status_checks: max,
            wait_between_tries: Duration::from_millis(10),
            log_fallback,
            ..PollConfig::default()
        }
    }

    const WAIT: PollStep = PollStep::Sleep(Duration::from_millis(10));

    #[test]
    fn qstat_status_finishes_immediately() {
        let mut m = PollMachine::new(&config(3, false));
        assert_eq!(m.start(), PollStep::Query(Source::Qstat));
        let step = m.on_result(Source::Qstat, QueryResult::Found(CanonicalStatus::Running));
        assert_eq!(
            step,
            PollStep::Finish(PollOutcome::Status(CanonicalStatus::Running))
        );
        assert!(m.is_done());
        assert_eq!(m.iteration(), 1);
    }

    #[test]
    fn absent_qstat_sleeps_then_tries_qacct() {
        let mut m = PollMachine::new(&config(3, false));
        m.start();
        assert_eq!(m.on_result(Source::Qstat, QueryResult::Absent), WAIT);
        assert_eq!(m.on_slept(), PollStep::Query(Source::Qacct));
        let step = m.on_result(Source::Qacct, QueryResult::Found(CanonicalStatus::Success));
        assert_eq!(
            step,
            PollStep::Finish(PollOutcome::Status(CanonicalStatus::Success))
        );
    }

    #[test]
    fn exhausts_after_max_iterations() {
        let mut m = PollMachine::new(&config(2, false));
        let mut step = m.start();
        let mut queries = Vec::new();
        loop {
            step = match step {
                PollStep::Query(source) => {
                    queries.push(source);
                    m.on_result(source, QueryResult::Absent)
                }
                PollStep::Sleep(_) => m.on_slept(),
                PollStep::Finish(outcome) => {
                    assert_eq!(outcome, PollOutcome::Exhausted);
                    break;
                }
            };
        }
        assert_eq!(
            queries,
            vec![Source::Qstat, Source::Qacct, Source::Qstat, Source::Qacct]
        );
        assert_eq!(m.iteration(), 2);
    }

    #[test]
    fn error_skips_rest_of_iteration_without_sleeping() {
        let mut m = PollMachine::new(&config(2, false));
        m.start();
        assert_eq!(
            m.on_result(Source::Qstat, QueryResult::Error),
            PollStep::Query(Source::Qstat)
        );
        assert_eq!(m.iteration(), 2);
        assert_eq!(
            m.on_result(Source::Qstat, QueryResult::Error),
            PollStep::Finish(PollOutcome::Exhausted)
        );
    }

    #[test]
    fn log_tail_consulted_only_when_enabled() {
        let mut m = PollMachine::new(&config(1, true));
        m.start();
        m.on_result(Source::Qstat, QueryResult::Absent);
        m.on_slept();
        m.on_result(Source::Qacct, QueryResult::Absent);
        assert_eq!(m.on_slept(), PollStep::Query(Source::LogTail));

        let mut m = PollMachine::new(&config(1, false));
        m.start();
        m.on_result(Source::Qstat, QueryResult::Absent);
        m.on_slept();
        m.on_result(Source::Qacct, QueryResult::Absent);
        assert_eq!(m.on_slept(), PollStep::Finish(PollOutcome::Exhausted));
    }

    #[test]
    fn running_from_log_tail_keeps_polling() {
        let mut m = PollMachine::new(&config(2, true));
        m.start();
        m.on_result(Source::Qstat, QueryResult::Absent);
        m.on_slept();
        m.on_result(Source::Qacct, QueryResult::Absent);
        m.on_slept();
        assert_eq!(
            m.on_result(Source::LogTail, QueryResult::Found(CanonicalStatus::Running)),
            PollStep::Query(Source::Qstat)
        );
        m.on_result(Source::Qstat, QueryResult::Absent);
        m.on_slept();
        m.on_result(Source::Qacct, QueryResult::Absent);
        m.on_slept();
        assert_eq!(
            m.on_result(Source::LogTail, QueryResult::Found(CanonicalStatus::Failed)),
            PollStep::Finish(PollOutcome::Status(CanonicalStatus::Failed))
        );
    }

    #[test]
    fn out_of_order_events_are_ignored() {
        let mut m = PollMachine::new(&config(3, false));
        m.start();
        // Result for a source we did not ask for.
        assert_eq!(
            m.on_result(Source::Qacct, QueryResult::Found(CanonicalStatus::Failed)),
            PollStep::Query(Source::Qstat)
        );
        // Sleep completion while querying.
        assert_eq!(m.on_slept(), PollStep::Query(Source::Qstat));
        assert_eq!(m.iteration(), 1);
    }
}
