//! Error types for ubash.
//!
//! - [`GrammarError`]: the line was rejected before any process was created.
//! - [`ShellError`]: everything that can abort a line, grammar included.
//!
//! Execution failures of a single stage (program not found) are not errors:
//! they are reported on the stage and the line still counts as handled.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed placement of `|`, `<`, `>` or an unresolvable token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// Line starts or ends with `|`.
    #[error("pipe at the start or end of the line")]
    PipeAtEdge,

    /// Two pipe separators with nothing between them.
    #[error("consecutive pipes")]
    ConsecutivePipes,

    /// A redirection token right after `|`.
    #[error("redirection `{token}` directly after a pipe")]
    RedirectionAfterPipe { token: String },

    /// `<` or `>` with no path fused to it.
    #[error("missing path after `{operator}`")]
    BareRedirection { operator: char },

    /// `<` anywhere but the end of the first command.
    #[error("input redirection `{token}` is only allowed at the end of the first command")]
    MisplacedInput { token: String },

    /// `>` followed by more tokens.
    #[error("output redirection `{token}` must be the last token")]
    MisplacedOutput { token: String },

    /// Same redirection kind given twice for one command.
    #[error("more than one {kind} redirection")]
    DuplicateRedirection { kind: &'static str },

    /// A redirection or pipe with no program in front of it.
    #[error("missing command before `{token}`")]
    MissingCommand { token: String },

    /// `cd` used with a pipe or a redirection.
    #[error("cd cannot be combined with pipes or redirections")]
    BuiltinCombined,

    /// `$NAME` with no value in the environment.
    #[error("undefined variable: ${name}")]
    UndefinedVariable { name: String },
}

/// Any failure that aborts the current line.
///
/// None of these terminate the interpreter; the caller reports the error and
/// moves on to the next line.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("cd: too many arguments")]
    CdTooManyArguments,

    #[error("cd: HOME not set")]
    HomeNotSet,

    #[error("cd: {}: {source}", path.display())]
    ChangeDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open {} for output: {source}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create pipe: {0}")]
    Pipe(#[source] io::Error),

    #[error("cannot start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// wait, dup or dup2 failed.
    #[error("{call} failed: {source}")]
    Syscall {
        call: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ShellError {
    /// True when the line was rejected before anything ran.
    pub fn is_grammar(&self) -> bool {
        matches!(self, ShellError::Grammar(_))
    }
}
