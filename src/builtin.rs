//! Commands run inside the shell process. `cd` is the only one.

use std::env;
use std::path::Path;

use log::info;

use crate::error::ShellError;

/// Change the working directory.
///
/// No argument, `-` or `~` goes to `home`. More than one argument is
/// rejected without touching the working directory.
pub fn cd(args: &[String], home: Option<&Path>) -> Result<(), ShellError> {
    let target = match args {
        [] => home.ok_or(ShellError::HomeNotSet)?,
        [arg] if arg == "-" || arg == "~" => home.ok_or(ShellError::HomeNotSet)?,
        [path] => Path::new(path),
        _ => return Err(ShellError::CdTooManyArguments),
    };

    env::set_current_dir(target).map_err(|source| ShellError::ChangeDir {
        path: target.to_path_buf(),
        source,
    })?;
    info!("cd {}", target.display());
    Ok(())
}
