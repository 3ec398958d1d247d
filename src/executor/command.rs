//! Command text formatting
//!
//! Builds the string handed to `<shell> -c`. The working directory is
//! entered from inside the shell so the caller's own directory never changes.

use std::path::Path;

use crate::error::ShellError;

/// Connective used to chain commands; later commands run only on success
pub const AND_CONNECTIVE: &str = " && ";

/// Escape spaces in a path with backslashes.
///
/// Escaping instead of quoting keeps `~` expansion working and leaves the
/// result safe to splice between `&&` connectives.
pub fn escape_path(path: &str) -> String {
    path.replace(' ', "\\ ")
}

/// Prefix `command` with a change into `dir`.
///
/// The directory is spliced into shell text, so it must be valid UTF-8.
pub fn format_command(dir: impl AsRef<Path>, command: &str) -> Result<String, ShellError> {
    let dir = dir.as_ref();
    let Some(text) = dir.to_str() else {
        return Err(ShellError::Config(format!(
            "working directory is not valid UTF-8: {}",
            dir.display()
        )));
    };
    Ok(format!("cd {}{}{}", escape_path(text), AND_CONNECTIVE, command))
}

/// Chain commands so each runs only if the previous one succeeded
pub fn join_commands<S: AsRef<str>>(commands: &[S]) -> String {
    commands
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join(AND_CONNECTIVE)
}

/// Append arguments to a command, separated by single spaces.
///
/// Arguments are inserted verbatim and are subject to shell word splitting.
pub fn with_arguments<S: AsRef<str>>(command: &str, args: &[S]) -> String {
    if args.is_empty() {
        return command.to_string();
    }
    let mut out = command.to_string();
    for arg in args {
        out.push(' ');
        out.push_str(arg.as_ref());
    }
    out
}
