use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use toolstrap::exec::{CommandOutput, CommandRunner, CommandSpec};

#[derive(Debug, Clone)]
enum Response {
    Output(CommandOutput),
    SpawnError,
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<CommandSpec>,
    responses: Vec<(String, Response)>,
}

/// [`CommandRunner`] that records every command instead of spawning it.
///
/// Commands succeed with empty output unless a response was scripted for
/// their program name (file name without directories). Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands whose program is named `program` with `output`.
    pub fn respond(&self, program: &str, output: CommandOutput) {
        self.inner
            .lock()
            .unwrap()
            .responses
            .push((program.to_string(), Response::Output(output)));
    }

    /// Make commands named `program` exit with `code`.
    pub fn fail(&self, program: &str, code: i32) {
        self.respond(program, CommandOutput::failed(code));
    }

    /// Make commands named `program` fail to start at all.
    pub fn unavailable(&self, program: &str) {
        self.inner
            .lock()
            .unwrap()
            .responses
            .push((program.to_string(), Response::SpawnError));
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Program names in call order.
    pub fn programs(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::program_name).collect()
    }

    /// Calls rendered as `program arg1 arg2`, using the bare program name.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| {
                std::iter::once(c.program_name())
                    .chain(c.args.iter().cloned())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(cmd.clone());

        let name = cmd.program_name();
        // Latest scripted response wins.
        let response = inner
            .responses
            .iter()
            .rev()
            .find(|(program, _)| *program == name)
            .map(|(_, r)| r.clone());

        match response {
            Some(Response::Output(out)) => Ok(out),
            Some(Response::SpawnError) => Err(anyhow!("failed to spawn {name}")),
            None => Ok(CommandOutput::ok("")),
        }
    }
}
