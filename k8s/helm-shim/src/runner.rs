use crate::{
    common::error::{CommandParse, CommandSpawn, Result},
    environment::EnvironmentOverrides,
};
use snafu::ResultExt;
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Exit code and captured output streams of a finished command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn new<O, E>(rc: i32, stdout: O, stderr: E) -> Self
    where
        O: ToString,
        E: ToString,
    {
        Self {
            rc,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    /// Did the command exit with 0?
    pub fn success(&self) -> bool {
        self.rc == 0
    }
}

/// Runs a command line to completion.
pub trait Runner {
    /// Runs the command with the overrides added to the inherited environment. A non-zero exit
    /// code is not an error at this level.
    fn run(&self, command: &str, overrides: &EnvironmentOverrides) -> Result<CommandResult>;
}

/// Runs commands as child processes of this process. Blocks until the child exits.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, command: &str, overrides: &EnvironmentOverrides) -> Result<CommandResult> {
        let argv = shlex::split(command).unwrap_or_default();
        let Some((program, args)) = argv.split_first() else {
            return CommandParse {
                command: command.to_string(),
            }
            .fail();
        };

        debug!(%program, ?args, env = ?overrides.keys().collect::<Vec<_>>(), "Running command");

        let output = Command::new(program)
            .args(args)
            .envs(overrides)
            .output()
            .context(CommandSpawn {
                command: command.to_string(),
            })?;

        // Undecodable bytes are replaced, the exit code and streams are always handed back.
        let stdout = String::from_utf8_lossy(output.stdout.as_slice()).into_owned();
        let stderr = String::from_utf8_lossy(output.stderr.as_slice()).into_owned();
        let rc = exit_code(output.status);
        debug!(rc, %stdout, "Command standard output");

        Ok(CommandResult { rc, stdout, stderr })
    }
}

/// The exit code of the process, or the negated signal number if a signal ended it.
fn exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    status.code().unwrap_or(-1)
}
