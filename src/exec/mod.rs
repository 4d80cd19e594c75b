mod pipeline;
mod single;
mod spawn;
mod stdio;

pub use spawn::{EXIT_NOT_EXECUTABLE, EXIT_NOT_FOUND};

use std::env;
use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::ExitStatus;

use log::{debug, warn};

use crate::builtin;
use crate::config::Config;
use crate::error::ShellError;
use crate::parse::{self, ParsedLine};

/// How one stage of a line terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    /// Position in the pipeline, 0 for a single command.
    pub stage: usize,
    /// Program name (`argv[0]`).
    pub program: String,
    /// Child pid; `None` if the program could not be executed at all.
    pub pid: Option<u32>,
    pub status: ExitStatus,
}

impl StageReport {
    /// Exit code, `None` when the child was killed by a signal.
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// A child that actually ran and did not exit cleanly.
    pub fn is_reportable_failure(&self) -> bool {
        self.pid.is_some() && !self.success()
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "process {pid} ({})", self.program)?,
            None => write!(f, "{}", self.program)?,
        }
        match (self.status.code(), self.status.signal()) {
            (Some(code), _) => write!(f, " exited with status {code}"),
            (None, Some(signal)) => write!(f, " terminated by signal {signal}"),
            (None, None) => write!(f, " terminated abnormally"),
        }
    }
}

/// Result of a line that was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Blank line, nothing ran.
    Empty,
    /// The `cd` builtin ran in-process.
    Builtin,
    /// External programs ran; one report per stage in stage order.
    Completed(Vec<StageReport>),
}

impl Outcome {
    pub fn reports(&self) -> &[StageReport] {
        match self {
            Outcome::Completed(reports) => reports,
            Outcome::Empty | Outcome::Builtin => &[],
        }
    }
}

/// Parses lines and dispatches them to the builtin, single-command or
/// pipeline executor.
#[derive(Debug, Clone)]
pub struct Shell {
    report_nonzero_exit: bool,
}

impl Shell {
    /// Build a shell from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            report_nonzero_exit: config.settings.report_nonzero_exit,
        }
    }

    /// Override whether non-zero pipeline stages are reported.
    pub fn set_report_nonzero_exit(&mut self, report: bool) {
        self.report_nonzero_exit = report;
    }

    /// Parse and run one line, resolving `$NAME` against the process environment.
    pub fn run_line(&self, line: &str) -> Result<Outcome, ShellError> {
        let parsed = parse::parse(line, |name| env::var(name).ok())?;
        self.dispatch(parsed)
    }

    /// Run an already parsed line.
    pub fn dispatch(&self, parsed: ParsedLine) -> Result<Outcome, ShellError> {
        match parsed {
            ParsedLine::Empty => Ok(Outcome::Empty),
            ParsedLine::Cd(args) => {
                let home = env::var_os("HOME");
                builtin::cd(&args, home.as_deref().map(Path::new))?;
                Ok(Outcome::Builtin)
            }
            ParsedLine::Single(command) => Ok(Outcome::Completed(vec![single::run(&command)?])),
            ParsedLine::Pipeline(piped) => Ok(Outcome::Completed(pipeline::run(
                &piped,
                self.report_nonzero_exit,
            )?)),
        }
    }

    /// Run one line and report any error on standard error.
    ///
    /// Returns `false` when the line was rejected or aborted. The shell
    /// itself stays usable either way.
    pub fn execute(&self, line: &str) -> bool {
        match self.run_line(line) {
            Ok(outcome) => {
                debug!("line handled: {outcome:?}");
                true
            }
            Err(err) => {
                warn!("line {:?} failed: {err}", line.trim_end());
                eprintln!("ubash: {err}");
                false
            }
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::from_config(&Config::default_config())
    }
}
