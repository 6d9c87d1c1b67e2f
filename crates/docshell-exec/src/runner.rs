//! Runs command lines through the platform shell.

use std::process::Stdio;

use tokio::process::Command;

use crate::outcome::{CommandOutcome, ExitState};

const BANNER: &str = "==================================================";

/// Executes fully formed command lines, one process per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner {
    verbose: bool,
    debug: bool,
}

impl CommandRunner {
    /// Create a quiet runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Echo captured stdout and stderr after each command.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Echo each command line, between banners, before running it.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Run `command` and wait for it to finish.
    ///
    /// Both output streams are read concurrently until the child closes
    /// them, so a command that writes a lot to both cannot stall on a full
    /// pipe. The command is attempted once.
    pub async fn run(&self, command: &str) -> CommandOutcome {
        if self.debug {
            tracing::info!("{}", BANNER);
            tracing::info!("{}", command);
            tracing::info!("{}", BANNER);
        }

        let outcome = match shell(command).output().await {
            Ok(output) => {
                let status = match output.status.code() {
                    Some(code) => ExitState::Exited(code),
                    None => ExitState::Terminated,
                };
                CommandOutcome::from_streams(output.stdout, &output.stderr, status)
            }
            Err(e) => CommandOutcome::spawn_failed(command, &e),
        };

        tracing::debug!("`{}` finished: {}", command, outcome.status);

        if self.verbose {
            tracing::info!("{}", String::from_utf8_lossy(&outcome.stdout));
            tracing::info!("{}", outcome.stderr);
        }

        outcome
    }
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    piped(cmd)
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    piped(cmd)
}

fn piped(mut cmd: Command) -> Command {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}
