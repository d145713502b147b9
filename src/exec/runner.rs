// src/exec/runner.rs

//! Pluggable subprocess runner.
//!
//! Tool integrations and build backends talk to a `CommandRunner` instead of
//! `std::process::Command` directly, so tests can record invocations and
//! script their results.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::dag::Environment;

/// Description of a process to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Variables set on top of the inherited environment.
    pub env: Vec<(String, String)>,
    /// Capture stdout/stderr instead of streaming them to the terminal.
    pub capture: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            capture: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Pass every variable the session environment changed.
    pub fn with_environment(mut self, env: &Environment) -> Self {
        self.env.extend(
            env.overrides()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        self
    }

    pub fn capture_output(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Program file name without directories (handy for matching in tests).
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.to_string_lossy().into_owned())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub success: bool,
    /// Empty unless the command was run with `capture_output`.
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32) -> Self {
        Self {
            code: Some(code),
            success: false,
            ..Self::default()
        }
    }
}

/// Trait abstracting how external commands are executed.
///
/// `Err` means the process could not be started at all; a process that ran
/// and exited non-zero is an `Ok` with `success == false`.
pub trait CommandRunner: Send + Sync + fmt::Debug {
    fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput>;

    /// Run and turn a non-zero exit into an error.
    fn run_checked(&self, cmd: &CommandSpec) -> Result<CommandOutput> {
        let output = self.run(cmd)?;
        if !output.success {
            anyhow::bail!(
                "command `{}` failed with exit code {}",
                cmd,
                output
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "<signal>".to_string())
            );
        }
        Ok(output)
    }
}

/// Runner that spawns real OS processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        info!(cmd = %spec, "running command");

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        cmd.envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }

        let output = if spec.capture {
            let out = cmd
                .stdin(Stdio::null())
                .output()
                .with_context(|| format!("spawning `{spec}`"))?;
            CommandOutput {
                code: out.status.code(),
                success: out.status.success(),
                stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            }
        } else {
            let status = cmd
                .status()
                .with_context(|| format!("spawning `{spec}`"))?;
            CommandOutput {
                code: status.code(),
                success: status.success(),
                ..CommandOutput::default()
            }
        };

        debug!(
            cmd = %spec,
            exit_code = ?output.code,
            success = output.success,
            "command exited"
        );
        Ok(output)
    }
}
