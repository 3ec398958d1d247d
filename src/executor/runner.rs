//! Shell command execution with timeout support
//!
//! Provides a unified interface for running shell commands with:
//! - Configurable timeouts
//! - Output capture (stdout/stderr)
//! - Live tee of either stream into a sink
//! - Working directory control without touching the caller's directory

use std::path::PathBuf;
use std::time::Duration;

use super::collector::Sink;
use super::command::join_commands;
use super::process::ShellProcess;
use crate::config::Config;
use crate::error::ShellError;

/// Default shell used for invocations
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Interval between liveness probes
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long to keep draining output after the process exits
pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Options for a shell execution
#[derive(Debug)]
pub struct ShellOptions {
    /// Directory the command runs in
    pub working_dir: PathBuf,
    /// Shell executable, absolute path or a name looked up on `PATH`
    pub shell: PathBuf,
    /// Timeout duration (None = no timeout)
    pub timeout: Option<Duration>,
    /// Receives a live copy of stdout
    pub output_sink: Option<Sink>,
    /// Receives a live copy of stderr
    pub error_sink: Option<Sink>,
    /// Interval between liveness probes
    pub poll_interval: Duration,
    /// Bound on draining output after exit
    pub drain_grace: Duration,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            shell: PathBuf::from(DEFAULT_SHELL),
            timeout: None,
            output_sink: None,
            error_sink: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            drain_grace: DEFAULT_DRAIN_GRACE,
        }
    }
}

impl ShellOptions {
    /// Create options with a working directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: dir.into(),
            ..Default::default()
        }
    }

    /// Build options from the `[defaults]` section of a configuration
    pub fn from_config(config: &Config) -> Self {
        let defaults = &config.defaults;
        Self {
            working_dir: PathBuf::from(&defaults.working_dir),
            shell: PathBuf::from(&defaults.shell),
            timeout: defaults.timeout(),
            output_sink: None,
            error_sink: None,
            poll_interval: defaults.poll_interval(),
            drain_grace: defaults.drain_grace(),
        }
    }

    /// Set the working directory
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Set the shell executable
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set timeout in seconds
    pub fn with_timeout_secs(self, secs: f64) -> Self {
        self.with_timeout(Duration::from_secs_f64(secs))
    }

    /// Tee stdout into a sink
    pub fn with_output_sink(mut self, sink: Sink) -> Self {
        self.output_sink = Some(sink);
        self
    }

    /// Tee stderr into a sink
    pub fn with_error_sink(mut self, sink: Sink) -> Self {
        self.error_sink = Some(sink);
        self
    }

    /// Set the liveness polling interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set how long output is drained after exit
    pub fn with_drain_grace(mut self, grace: Duration) -> Self {
        self.drain_grace = grace;
        self
    }
}

/// Run a shell command and return its trimmed standard output
///
/// # Arguments
/// * `command` - Command text handed to the shell
/// * `options` - Execution options
///
/// # Errors
/// * `ShellError::Launch` - If the shell couldn't be spawned
/// * `ShellError::Exit` - If the command exited with a non-zero status
/// * `ShellError::Timeout` - If the command outlived its timeout
pub async fn run_shell(command: &str, options: ShellOptions) -> Result<String, ShellError> {
    ShellProcess::new(command, options).run().await
}

/// Run commands in order, each only if the previous one succeeded
///
/// The combined stdout of all commands is returned.
pub async fn run_series<S: AsRef<str>>(
    commands: &[S],
    options: ShellOptions,
) -> Result<String, ShellError> {
    run_shell(&join_commands(commands), options).await
}

/// Run a shell command synchronously (convenience wrapper for sync contexts)
///
/// Blocks the calling thread for the lifetime of the process. Must not be
/// called from inside a tokio runtime.
pub fn run_shell_sync(command: &str, options: ShellOptions) -> Result<String, ShellError> {
    // Create a new runtime for the sync call
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(run_shell(command, options))
}

/// Synchronous form of [`run_series`]
pub fn run_series_sync<S: AsRef<str>>(
    commands: &[S],
    options: ShellOptions,
) -> Result<String, ShellError> {
    run_shell_sync(&join_commands(commands), options)
}
