//! Redirection files and the parent's saved standard streams.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::{AsFd, AsRawFd, OwnedFd, RawFd};
use std::path::Path;

use log::{debug, warn};
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::unistd::dup2;

use crate::error::ShellError;

/// Open `path` read-only for an input redirection.
pub(crate) fn open_input(path: &Path) -> Result<File, ShellError> {
    File::open(path).map_err(|source| ShellError::OpenInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Open `path` write-only for an output redirection, creating or truncating it.
pub(crate) fn open_output(path: &Path) -> Result<File, ShellError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| ShellError::OpenOutput {
            path: path.to_path_buf(),
            source,
        })
}

fn syscall(call: &'static str) -> impl FnOnce(io::Error) -> ShellError {
    move |source| ShellError::Syscall { call, source }
}

fn rebind(from: RawFd, to: RawFd) -> Result<(), ShellError> {
    dup2(from, to)
        .map(drop)
        .map_err(|errno| ShellError::Syscall {
            call: "dup2",
            source: errno.into(),
        })
}

/// Point the parent's standard input at `file` so the first stage of a
/// pipeline inherits it. Only call this while a [`SavedStdio`] is held.
/// The parent's own handle on `file` is closed on return.
pub(crate) fn redirect_stdin(file: File) -> Result<(), ShellError> {
    rebind(file.as_raw_fd(), STDIN_FILENO)
}

/// Copies of the parent's standard input and output taken before a pipeline.
///
/// The originals are put back by [`SavedStdio::restore`], or by `Drop` on
/// any path that never reaches it.
pub(crate) struct SavedStdio {
    stdin: Option<OwnedFd>,
    stdout: Option<OwnedFd>,
}

impl SavedStdio {
    pub(crate) fn save() -> Result<Self, ShellError> {
        let stdin = io::stdin()
            .as_fd()
            .try_clone_to_owned()
            .map_err(syscall("dup"))?;
        let stdout = io::stdout()
            .as_fd()
            .try_clone_to_owned()
            .map_err(syscall("dup"))?;
        debug!(
            "saved stdin as fd {}, stdout as fd {}",
            stdin.as_raw_fd(),
            stdout.as_raw_fd()
        );
        Ok(Self {
            stdin: Some(stdin),
            stdout: Some(stdout),
        })
    }

    /// Put the saved streams back and close the copies.
    pub(crate) fn restore(mut self) -> Result<(), ShellError> {
        self.restore_fds()
    }

    fn restore_fds(&mut self) -> Result<(), ShellError> {
        let _ = io::stdout().flush();
        let mut failure = None;
        if let Some(fd) = self.stdin.take()
            && let Err(err) = rebind(fd.as_raw_fd(), STDIN_FILENO)
        {
            failure.get_or_insert(err);
        }
        if let Some(fd) = self.stdout.take()
            && let Err(err) = rebind(fd.as_raw_fd(), STDOUT_FILENO)
        {
            failure.get_or_insert(err);
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for SavedStdio {
    fn drop(&mut self) {
        if let Err(err) = self.restore_fds() {
            warn!("failed to restore standard streams: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_input(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, ShellError::OpenInput { .. }));
    }

    #[test]
    fn open_output_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old contents").unwrap();
        drop(open_output(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn open_output_creates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let mut file = open_output(&path).unwrap();
        file.write_all(b"x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn open_output_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_output(&dir.path().join("no/such/dir/out.txt")).unwrap_err();
        assert!(matches!(err, ShellError::OpenOutput { .. }));
    }
}
