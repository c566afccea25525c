//! Applying a MetaMode through the nvidia-settings binary

use std::fmt;
use std::io;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::constants::nvidia::{ASSIGN_FLAG, METAMODE_ATTRIBUTE, PROGRAM};

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("failed to run {program} (is it installed and in PATH?)")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}:\n{stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Launches external programs; replaced by a recording fake in tests
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        (**self).run(program, args)
    }
}

/// Runs programs with [`std::process::Command`], blocking until they exit
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// A single nvidia-settings invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl SettingsCommand {
    /// `nvidia-settings --assign CurrentMetaMode=<metamode>`
    pub fn assign_metamode(metamode: &str) -> Self {
        Self {
            program: PROGRAM.to_string(),
            args: vec![
                ASSIGN_FLAG.to_string(),
                format!("{METAMODE_ATTRIBUTE}={metamode}"),
            ],
        }
    }
}

/// Shell-style rendering for logs, e.g. `nvidia-settings --assign CurrentMetaMode="DP-0: ..."`
impl fmt::Display for SettingsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if !arg.contains(char::is_whitespace) {
                write!(f, " {arg}")?;
            } else if let Some((name, value)) = arg.split_once('=') {
                write!(f, " {name}=\"{value}\"")?;
            } else {
                write!(f, " \"{arg}\"")?;
            }
        }
        Ok(())
    }
}

pub struct NvidiaSettings<R: CommandRunner = SystemRunner> {
    runner: R,
}

impl<R: CommandRunner> NvidiaSettings<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Run `command` to completion
    ///
    /// A spawn failure or non-zero exit is an error carrying the process's
    /// stderr; on success the captured output is returned for echoing.
    pub fn apply(&self, command: &SettingsCommand) -> Result<ProcessOutput, ApplyError> {
        debug!(command = %command, "Running");
        let output = self
            .runner
            .run(&command.program, &command.args)
            .map_err(|source| ApplyError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        if !output.success {
            let status = output
                .code
                .map(|code| format!("status {code}"))
                .unwrap_or_else(|| "no status (terminated by signal)".to_string());
            return Err(ApplyError::Failed {
                program: command.program.clone(),
                status,
                stderr: output.stderr,
            });
        }

        debug!(code = ?output.code, "Command finished");
        Ok(output)
    }
}
