//! ubash: the parsing and execution core of a small line-oriented shell.
//!
//! One input line is split into tokens, checked against the pipe and
//! redirection grammar, and run as one or more child processes with their
//! standard streams wired together. Malformed lines are rejected before any
//! process is created.
//!
//! # Architecture
//!
//! - **[`parse`]**: Token queue, tokenizer with `$NAME` expansion, grammar checks, command builder.
//! - **[`exec`]**: Dispatch, single-command executor, pipeline orchestrator, exit reports.
//! - **[`builtin`]**: The `cd` builtin.
//! - **[`error`]**: Grammar and execution error types.
//! - **[`config`]**: Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]**: File logger setup for the `ubash` binary.

/// The `cd` builtin.
pub mod builtin;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Error types shared by the parser and the executors.
pub mod error;
/// Line dispatch and process execution.
pub mod exec;
/// File-based logging.
pub mod logging;
/// Tokenizing, grammar validation and command construction.
pub mod parse;

pub use error::{GrammarError, ShellError};
pub use exec::{Outcome, Shell, StageReport};

/// Run one line with the default configuration.
///
/// This is the main entry point for tests and simple usage.
/// For the interactive binary, build a [`Shell`] from the loaded config.
pub fn run_line(line: &str) -> Result<Outcome, ShellError> {
    Shell::default().run_line(line)
}
