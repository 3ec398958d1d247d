//! Shell execution module
//!
//! Provides shell command execution with:
//! - Timeout enforcement by polling and `SIGKILL`
//! - Concurrent stdout/stderr capture
//! - Optional live tee into sinks
//! - Working directory control

pub mod collector;
pub mod command;
pub mod deadline;
pub mod process;
pub mod runner;
pub mod signal;

pub use collector::{decode_output, Sink, StreamCollector};
pub use command::{escape_path, format_command, join_commands, with_arguments};
pub use deadline::DeadlineMonitor;
pub use process::{ProcessState, ShellProcess};
pub use runner::*;
pub use signal::{OsSignalSender, ProcessSignal, SignalSender};
