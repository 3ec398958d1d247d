//! CLI module for shellac
//!
//! Runs one or more shell commands, chained with `&&`, and reports the
//! captured output or a structured failure.

pub mod commands;

pub use commands::{exit_code_for, Cli, OutputFormat};
