//! shellac - run shell commands and capture what they print
//!
//! Each call executes exactly one `<shell> -c` invocation:
//! - **Working directory** - entered from inside the shell (`cd dir && ...`)
//! - **Capture** - stdout and stderr are drained concurrently
//! - **Tee** - either stream can be copied live into a [`Sink`]
//! - **Timeout** - enforced by polling and `SIGKILL`
//!
//! ## Errors
//!
//! - [`ShellError::Exit`] - non-zero status with captured stdout and stderr
//! - [`ShellError::Timeout`] - deadline passed, partial output discarded
//! - [`ShellError::Launch`] - the shell itself could not be started
//!
//! ```no_run
//! use shellac::{run_shell_sync, ShellOptions};
//!
//! let greeting = run_shell_sync("echo hello", ShellOptions::default())?;
//! assert_eq!(greeting, "hello");
//! # Ok::<(), shellac::ShellError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;

pub use cli::Cli;
pub use config::{load_config, Config};
pub use error::{ErrorInfo, ShellError};
pub use executor::{
    run_series, run_series_sync, run_shell, run_shell_sync, with_arguments, ProcessSignal,
    ShellOptions, ShellProcess, Sink,
};
