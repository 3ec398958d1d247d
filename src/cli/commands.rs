//! CLI definition using clap

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::error::ShellError;

/// Exit code reported when a command timed out, as with coreutils `timeout`
pub const TIMEOUT_EXIT_CODE: u8 = 124;

/// Run shell commands with captured output and an optional timeout.
///
/// Multiple commands are chained with `&&`: each runs only if the previous
/// one succeeded.
#[derive(Parser, Debug)]
#[command(name = "shellac")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Commands to run
    #[arg(required = true)]
    pub commands: Vec<String>,

    /// Directory to run the commands in
    #[arg(short = 'C', long)]
    pub dir: Option<PathBuf>,

    /// Shell executable (path or name on PATH)
    #[arg(long)]
    pub shell: Option<String>,

    /// Timeout in seconds, fractions allowed (e.g. 0.5)
    #[arg(short, long, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Tee output to the terminal while running instead of printing it afterwards
    #[arg(long)]
    pub stream: bool,

    /// Tee standard output into a file
    #[arg(long, conflicts_with = "stream")]
    pub stdout_file: Option<PathBuf>,

    /// Tee standard error into a file
    #[arg(long, conflicts_with = "stream")]
    pub stderr_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Config file path (overrides default XDG paths)
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Captured output as plain text
    Text,
    /// JSON object with the output or error details
    Json,
}

/// Parse a timeout given in (possibly fractional) seconds
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("invalid timeout '{}': expected seconds", s))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("invalid timeout '{}': must be a positive number", s));
    }
    Ok(Duration::from_secs_f64(secs))
}

/// Process exit code to report for a failed execution
pub fn exit_code_for(err: &ShellError) -> u8 {
    match err {
        ShellError::Exit { code, .. } => match u8::try_from(*code) {
            Ok(0) | Err(_) => 1,
            Ok(code) => code,
        },
        ShellError::Timeout { .. } => TIMEOUT_EXIT_CODE,
        _ => 1,
    }
}
