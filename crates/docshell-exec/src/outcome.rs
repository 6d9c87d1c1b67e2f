//! Result of a single command invocation.

use std::fmt;

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// The process exited with this status code
    Exited(i32),

    /// The process was terminated by a signal
    Terminated,

    /// The process could not be started at all
    SpawnFailed,
}

impl fmt::Display for ExitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitState::Exited(code) => write!(f, "exit status {}", code),
            ExitState::Terminated => f.write_str("terminated by signal"),
            ExitState::SpawnFailed => f.write_str("failed to spawn"),
        }
    }
}

/// Captured output of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Standard output, byte for byte
    pub stdout: Vec<u8>,

    /// Standard error with trailing whitespace removed
    pub stderr: String,

    /// Exit indicator
    pub status: ExitState,
}

impl CommandOutcome {
    /// Build an outcome from raw stream bytes.
    ///
    /// Stdout is kept as is. Stderr is only a diagnostic, so invalid UTF-8 in
    /// it is replaced.
    pub fn from_streams(stdout: Vec<u8>, stderr: &[u8], status: ExitState) -> Self {
        Self {
            stdout,
            stderr: String::from_utf8_lossy(stderr).trim_end().to_string(),
            status,
        }
    }

    /// Outcome for a command that never started.
    pub fn spawn_failed(command: &str, error: &std::io::Error) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: format!("failed to spawn `{}`: {}", command, error),
            status: ExitState::SpawnFailed,
        }
    }

    /// True only when the process exited with status 0.
    pub fn succeeded(&self) -> bool {
        self.status == ExitState::Exited(0)
    }
}
