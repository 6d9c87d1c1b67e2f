//! Shell command execution for docshell.
//!
//! Runs a single command line through the platform shell, drains both output
//! streams, and hands everything back as a [`CommandOutcome`]. Nothing here
//! returns an error: a command that cannot be spawned or exits non-zero is
//! still an outcome, and the caller decides what it means.

pub mod outcome;
pub mod runner;

pub use outcome::{CommandOutcome, ExitState};
pub use runner::CommandRunner;
