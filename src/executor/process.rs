//! Shell process lifecycle
//!
//! A [`ShellProcess`] moves through
//! `Created -> Launched -> {Exited | Killed} -> Finalized`.
//! Exit is detected by polling: every interval the child is checked for
//! exit and probed with signal 0. Once the deadline has passed a `SIGKILL`
//! is sent on each tick until the process is gone.

use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};

use super::collector::{decode_output, Sink, StreamCollector};
use super::command::format_command;
use super::deadline::DeadlineMonitor;
use super::runner::ShellOptions;
use super::signal::{OsSignalSender, ProcessSignal, SignalSender};
use crate::error::ShellError;

/// Lifecycle state of a [`ShellProcess`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Configured, no OS resources allocated
    Created,
    /// Spawned and possibly still running
    Launched,
    /// Exited on its own
    Exited,
    /// Gone after a kill triggered by the deadline
    Killed,
    /// Result or error assembled
    Finalized,
}

/// A single shell invocation
pub struct ShellProcess {
    working_dir: PathBuf,
    command: String,
    shell: PathBuf,
    timeout: Option<Duration>,
    poll_interval: Duration,
    drain_grace: Duration,
    output_sink: Option<Sink>,
    error_sink: Option<Sink>,
    signals: Arc<dyn SignalSender>,
    child: Option<Child>,
    pid: Option<u32>,
    deadline: Option<DeadlineMonitor>,
    status: Option<ExitStatus>,
    kill_sent: bool,
    state: ProcessState,
}

impl ShellProcess {
    /// Prepare `command` to run in `options.working_dir`
    pub fn new(command: &str, options: ShellOptions) -> Self {
        Self {
            working_dir: options.working_dir,
            command: command.to_string(),
            shell: options.shell,
            timeout: options.timeout,
            poll_interval: options.poll_interval,
            drain_grace: options.drain_grace,
            output_sink: options.output_sink,
            error_sink: options.error_sink,
            signals: Arc::new(OsSignalSender),
            child: None,
            pid: None,
            deadline: None,
            status: None,
            kill_sent: false,
            state: ProcessState::Created,
        }
    }

    /// Replace the signal sender used for probing and killing
    pub fn with_signal_sender(mut self, signals: Arc<dyn SignalSender>) -> Self {
        self.signals = signals;
        self
    }

    /// Full command line passed to `<shell> -c`
    pub fn command_line(&self) -> Result<String, ShellError> {
        format_command(&self.working_dir, &self.command)
    }

    /// Current lifecycle state
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// OS process id once launched
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Whether the deadline has passed. Always false before launch.
    pub fn is_expired(&self) -> bool {
        self.deadline.map(|d| d.is_expired()).unwrap_or(false)
    }

    /// Termination status code once the process has been reaped.
    ///
    /// A process terminated by a signal reports the signal number.
    pub fn exit_code(&self) -> Option<i32> {
        self.status.map(status_code)
    }

    /// Spawn the shell and start the deadline clock.
    ///
    /// Returns the piped stdout and stderr of the child.
    pub fn launch(&mut self) -> Result<(ChildStdout, ChildStderr), ShellError> {
        if self.state != ProcessState::Created {
            return Err(ShellError::Io(std::io::Error::other(
                "shell process was already launched",
            )));
        }

        let command = self.command_line()?;
        let shell = resolve_shell(&self.shell)?;
        let mut cmd = Command::new(&shell);
        cmd.arg("-c").arg(&command);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| ShellError::Launch {
            shell: shell.display().to_string(),
            error: e.to_string(),
        })?;

        self.pid = child.id();
        self.deadline = Some(DeadlineMonitor::start(self.timeout));
        tracing::debug!(
            pid = self.pid,
            shell = %shell.display(),
            "Launched: {}",
            command
        );

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("child stdout was not piped"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("child stderr was not piped"))?;

        self.child = Some(child);
        self.state = ProcessState::Launched;
        Ok((stdout, stderr))
    }

    /// Poll until the process is gone, killing it once the deadline passes.
    ///
    /// Returns immediately if the process was never launched.
    pub async fn wait_until_exit(&mut self) -> Result<(), ShellError> {
        if self.state != ProcessState::Launched {
            return Ok(());
        }
        let (Some(child), Some(pid)) = (self.child.as_mut(), self.pid) else {
            return Ok(());
        };

        loop {
            if let Some(status) = child.try_wait()? {
                self.status = Some(status);
                break;
            }
            if !self.signals.send(pid, ProcessSignal::Check) {
                tracing::debug!(pid, "Existence probe failed, process is gone");
                break;
            }
            if self.deadline.map(|d| d.is_expired()).unwrap_or(false) {
                if !self.kill_sent {
                    tracing::warn!(pid, "Deadline passed, killing process");
                }
                // best effort, the next probe tells us whether it worked
                self.signals.send(pid, ProcessSignal::Kill);
                self.kill_sent = true;
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        if self.status.is_none() {
            match child.try_wait() {
                Ok(status) => self.status = status,
                Err(e) => tracing::warn!(pid, "Could not collect exit status: {}", e),
            }
        }

        self.state = if self.kill_sent {
            ProcessState::Killed
        } else {
            ProcessState::Exited
        };
        tracing::debug!(pid, code = self.exit_code(), state = ?self.state, "Process finished");
        Ok(())
    }

    /// Launch, drain both streams, wait for exit and assemble the result
    pub async fn run(mut self) -> Result<String, ShellError> {
        let (stdout, stderr) = self.launch()?;
        let output = StreamCollector::spawn("stdout", stdout, self.output_sink.take());
        let error = StreamCollector::spawn("stderr", stderr, self.error_sink.take());

        self.wait_until_exit().await?;
        self.finalize(output, error).await
    }

    async fn finalize(
        &mut self,
        output: StreamCollector,
        error: StreamCollector,
    ) -> Result<String, ShellError> {
        self.state = ProcessState::Finalized;

        // Partial output after a kill is unreliable; sinks keep what they got.
        if self.is_expired() {
            let (output_sink, error_sink) = tokio::join!(
                output.detach(self.drain_grace),
                error.detach(self.drain_grace)
            );
            close_sink(output_sink, "stdout").await;
            close_sink(error_sink, "stderr").await;
            return Err(ShellError::timeout());
        }

        let (output, error) = tokio::join!(
            output.finish(self.drain_grace),
            error.finish(self.drain_grace)
        );
        if !(output.complete && error.complete) {
            tracing::debug!(
                pid = self.pid,
                stdout_complete = output.complete,
                stderr_complete = error.complete,
                "Using output collected before the drain grace ran out"
            );
        }
        close_sink(output.sink, "stdout").await;
        close_sink(error.sink, "stderr").await;
        let (output, error) = (output.bytes, error.bytes);

        match self.exit_code() {
            Some(0) => Ok(decode_output(&output)),
            Some(code) => Err(ShellError::Exit {
                code,
                output: decode_output(&output),
                error: decode_output(&error),
            }),
            None => {
                tracing::warn!(pid = self.pid, "Exit status unknown, reporting failure");
                Err(ShellError::Exit {
                    code: -1,
                    output: decode_output(&output),
                    error: decode_output(&error),
                })
            }
        }
    }
}

/// Close a sink owned by this execution; standard streams stay open
async fn close_sink(sink: Option<Sink>, stream: &'static str) {
    let Some(sink) = sink else {
        return;
    };
    if sink.is_standard() {
        return;
    }
    if let Err(e) = sink.close().await {
        tracing::warn!(stream, "Failed to close sink: {}", e);
    }
}

fn status_code(status: ExitStatus) -> i32 {
    status.code().or_else(|| status.signal()).unwrap_or(-1)
}

/// Resolve a bare shell name such as `bash` on `PATH`
fn resolve_shell(shell: &Path) -> Result<PathBuf, ShellError> {
    if shell.is_absolute() || shell.components().count() > 1 {
        return Ok(shell.to_path_buf());
    }
    which::which(shell).map_err(|e| ShellError::Launch {
        shell: shell.display().to_string(),
        error: e.to_string(),
    })
}
