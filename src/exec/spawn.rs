use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, ExitStatus, Stdio};

use log::{debug, warn};

use crate::error::ShellError;

/// Exit code reported for a program that could not be found.
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit code reported for a program that exists but could not be executed.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// A started stage: either a running child or a program that never ran.
#[derive(Debug)]
pub(crate) enum Launch {
    Running(Child),
    NotExecuted(ExitStatus),
}

impl Launch {
    /// Block until the stage has terminated; returns its pid (if it had one)
    /// and exit status.
    pub(crate) fn wait(self) -> io::Result<(Option<u32>, ExitStatus)> {
        match self {
            Launch::Running(mut child) => {
                let pid = child.id();
                match child.wait() {
                    Ok(status) => {
                        debug!("pid {pid} finished: {status}");
                        Ok((Some(pid), status))
                    }
                    Err(err) => {
                        warn!("wait for pid {pid} failed: {err}");
                        // One non-blocking attempt so an exited child is not
                        // left as a zombie.
                        match child.try_wait() {
                            Ok(Some(status)) => Ok((Some(pid), status)),
                            _ => Err(err),
                        }
                    }
                }
            }
            Launch::NotExecuted(status) => Ok((None, status)),
        }
    }
}

/// Start `argv[0]` with `argv[1..]`, binding the given descriptors.
///
/// `None` leaves the stream inherited from the parent. The `Stdio` values
/// are owned by the temporary `Command` and closed in the parent before this
/// returns, so only the child keeps them open.
///
/// A program that cannot be found or executed is reported on standard error
/// and yields [`Launch::NotExecuted`] instead of an error; any other spawn
/// failure aborts the line.
pub(crate) fn spawn(
    argv: &[String],
    stdin: Option<Stdio>,
    stdout: Option<Stdio>,
) -> Result<Launch, ShellError> {
    let Some((program, args)) = argv.split_first() else {
        return Err(ShellError::Spawn {
            program: String::new(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty command"),
        });
    };

    let mut command = std::process::Command::new(program);
    command.args(args);
    if let Some(stdin) = stdin {
        command.stdin(stdin);
    }
    if let Some(stdout) = stdout {
        command.stdout(stdout);
    }

    match command.spawn() {
        Ok(child) => {
            debug!("spawned {program} as pid {}", child.id());
            Ok(Launch::Running(child))
        }
        Err(err) => match not_executed_code(&err) {
            Some(code) => {
                warn!("{program}: {err}");
                if code == EXIT_NOT_FOUND {
                    eprintln!("ubash: {program}: command not found");
                } else {
                    eprintln!("ubash: {program}: {err}");
                }
                Ok(Launch::NotExecuted(ExitStatus::from_raw(code << 8)))
            }
            None => Err(ShellError::Spawn {
                program: program.clone(),
                source: err,
            }),
        },
    }
}

/// Exit code for errors that belong to the program rather than the system.
fn not_executed_code(err: &io::Error) -> Option<i32> {
    match err.kind() {
        io::ErrorKind::NotFound => Some(EXIT_NOT_FOUND),
        io::ErrorKind::PermissionDenied | io::ErrorKind::InvalidInput => Some(EXIT_NOT_EXECUTABLE),
        _ if err.raw_os_error() == Some(nix::libc::ENOEXEC) => Some(EXIT_NOT_EXECUTABLE),
        _ => None,
    }
}
