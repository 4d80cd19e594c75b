use std::process::Stdio;

use log::info;

use super::StageReport;
use super::spawn::spawn;
use super::stdio::{open_input, open_output};
use crate::error::ShellError;
use crate::parse::Command;

/// Run one command as exactly one child process and wait for it.
///
/// Redirection files are opened before the spawn; a missing input file
/// aborts the line without starting anything. Each opened file is handed to
/// the child and the parent's handle is closed on every path.
pub(crate) fn run(command: &Command) -> Result<StageReport, ShellError> {
    let input = command.input.as_deref().map(open_input).transpose()?;
    let output = command.output.as_deref().map(open_output).transpose()?;

    let launch = spawn(
        &command.argv,
        input.map(Stdio::from),
        output.map(Stdio::from),
    )?;
    let (pid, status) = launch.wait().map_err(|source| ShellError::Syscall {
        call: "wait",
        source,
    })?;

    info!("{} finished with {status}", command.program());
    Ok(StageReport {
        stage: 0,
        program: command.program().to_string(),
        pid,
        status,
    })
}
