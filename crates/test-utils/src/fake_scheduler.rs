use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use gridpoll::errors::Result;
use gridpoll::scheduler::{CommandOutput, SchedulerBackend, SchedulerCommand};

/// What the fake does for one invocation.
#[derive(Debug, Clone)]
pub enum FakeReply {
    Output(CommandOutput),
    /// Simulate a failure to launch the process.
    LaunchError(String),
}

impl FakeReply {
    pub fn stdout(text: &str) -> Self {
        FakeReply::Output(CommandOutput::new(0, text, ""))
    }

    pub fn exit(code: i32, stderr: &str) -> Self {
        FakeReply::Output(CommandOutput::new(code, "", stderr))
    }

    pub fn empty() -> Self {
        FakeReply::Output(CommandOutput::new(0, "", ""))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Tool {
    Qstat,
    Qacct,
    Qdel,
}

impl From<SchedulerCommand> for Tool {
    fn from(cmd: SchedulerCommand) -> Self {
        match cmd {
            SchedulerCommand::Detail(_) => Tool::Qstat,
            SchedulerCommand::Accounting(_) => Tool::Qacct,
            SchedulerCommand::Delete(_) => Tool::Qdel,
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    queued: HashMap<Tool, VecDeque<FakeReply>>,
    fallback: HashMap<Tool, FakeReply>,
}

/// A scheduler backend that:
/// - records every command it was asked to run
/// - answers from a per-tool script: queued replies first, then the
///   tool's fallback reply (default: exit 1, "job does not exist").
///
/// Clones share the same script and call log.
#[derive(Debug, Clone, Default)]
pub struct FakeScheduler {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Vec<SchedulerCommand>>>,
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one reply for the next `qstat`.
    pub fn qstat_once(self, reply: FakeReply) -> Self {
        self.push(Tool::Qstat, reply)
    }

    /// Queue one reply for the next `qacct`.
    pub fn qacct_once(self, reply: FakeReply) -> Self {
        self.push(Tool::Qacct, reply)
    }

    /// Reply used for every `qstat` once the queue is empty.
    pub fn qstat_always(self, reply: FakeReply) -> Self {
        self.set_fallback(Tool::Qstat, reply)
    }

    /// Reply used for every `qacct` once the queue is empty.
    pub fn qacct_always(self, reply: FakeReply) -> Self {
        self.set_fallback(Tool::Qacct, reply)
    }

    /// Reply used for every `qdel`.
    pub fn qdel_always(self, reply: FakeReply) -> Self {
        self.set_fallback(Tool::Qdel, reply)
    }

    /// All commands run so far, in order.
    pub fn calls(&self) -> Vec<SchedulerCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_qstat(&self) -> usize {
        self.count(Tool::Qstat)
    }

    pub fn count_qacct(&self) -> usize {
        self.count(Tool::Qacct)
    }

    pub fn count_qdel(&self) -> usize {
        self.count(Tool::Qdel)
    }

    fn count(&self, tool: Tool) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| Tool::from(**c) == tool)
            .count()
    }

    fn push(self, tool: Tool, reply: FakeReply) -> Self {
        self.script
            .lock()
            .unwrap()
            .queued
            .entry(tool)
            .or_default()
            .push_back(reply);
        self
    }

    fn set_fallback(self, tool: Tool, reply: FakeReply) -> Self {
        self.script.lock().unwrap().fallback.insert(tool, reply);
        self
    }

    fn next_reply(&self, tool: Tool) -> FakeReply {
        let mut script = self.script.lock().unwrap();
        if let Some(reply) = script.queued.get_mut(&tool).and_then(|q| q.pop_front()) {
            return reply;
        }
        script
            .fallback
            .get(&tool)
            .cloned()
            .unwrap_or_else(|| FakeReply::exit(1, "job does not exist"))
    }
}

impl SchedulerBackend for FakeScheduler {
    fn run(
        &self,
        command: SchedulerCommand,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + '_>> {
        self.calls.lock().unwrap().push(command);
        let reply = self.next_reply(Tool::from(command));

        Box::pin(async move {
            match reply {
                FakeReply::Output(out) => Ok(out),
                FakeReply::LaunchError(msg) => Err(anyhow::anyhow!(msg).into()),
            }
        })
    }
}
