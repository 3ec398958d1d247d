//! shellac CLI entry point
//!
//! Usage:
//!   shellac 'echo hello'                 Run a command, print its output
//!   shellac -C /tmp 'ls' 'pwd'           Run a chain of commands in a directory
//!   shellac -t 0.5 'sleep 5'             Kill the command after half a second
//!   shellac --stream 'make build'        Tee output live instead of at the end

use std::fs::File;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use shellac::cli::{exit_code_for, Cli, OutputFormat};
use shellac::config::{load_config, Config};
use shellac::logging::init_logging;
use shellac::{run_series, ErrorInfo, ShellError, ShellOptions, Sink};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.log_json) {
        eprintln!("{}: {:#}", "warning".yellow().bold(), e);
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    let options = build_options(&cli, &config)?;

    tracing::debug!("Running {} command(s)", cli.commands.len());
    let result = run_series(&cli.commands, options).await;

    match cli.format {
        OutputFormat::Json => report_json(result),
        OutputFormat::Text => Ok(report_text(result, cli.stream)),
    }
}

/// Merge CLI flags over the configured defaults
fn build_options(cli: &Cli, config: &Config) -> Result<ShellOptions> {
    let mut options = ShellOptions::from_config(config);

    if let Some(ref dir) = cli.dir {
        options = options.with_dir(dir);
    }
    if let Some(ref shell) = cli.shell {
        options = options.with_shell(shell);
    }
    if let Some(timeout) = cli.timeout {
        options = options.with_timeout(timeout);
    }

    if cli.stream {
        options = options
            .with_output_sink(Sink::Stdout)
            .with_error_sink(Sink::Stderr);
    }
    if let Some(ref path) = cli.stdout_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        options = options.with_output_sink(Sink::file(file));
    }
    if let Some(ref path) = cli.stderr_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        options = options.with_error_sink(Sink::file(file));
    }

    Ok(options)
}

fn report_text(result: Result<String, ShellError>, streamed: bool) -> ExitCode {
    match result {
        Ok(output) => {
            if !streamed && !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let ShellError::Exit {
                ref output,
                ref error,
                ..
            } = e
            {
                if !streamed {
                    if !output.is_empty() {
                        println!("{}", output);
                    }
                    if !error.is_empty() {
                        eprintln!("{}", error);
                    }
                }
            }
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn report_json(result: Result<String, ShellError>) -> Result<ExitCode> {
    let (value, code) = match result {
        Ok(output) => (
            serde_json::json!({ "success": true, "output": output }),
            ExitCode::SUCCESS,
        ),
        Err(e) => (
            serde_json::json!({ "success": false, "error": ErrorInfo::from(&e) }),
            ExitCode::from(exit_code_for(&e)),
        ),
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_build_options_cli_overrides_config() {
        let mut config = Config::default();
        config.defaults.shell = "/bin/bash".to_string();
        config.defaults.timeout_ms = Some(10_000);

        let cli = Cli::parse_from(["shellac", "-C", "/tmp", "-t", "1", "true"]);
        let options = build_options(&cli, &config).unwrap();

        assert_eq!(options.working_dir, std::path::PathBuf::from("/tmp"));
        assert_eq!(options.shell, std::path::PathBuf::from("/bin/bash"));
        assert_eq!(options.timeout, Some(Duration::from_secs(1)));
        assert!(options.output_sink.is_none());
    }

    #[test]
    fn test_build_options_stream_uses_standard_sinks() {
        let cli = Cli::parse_from(["shellac", "--stream", "true"]);
        let options = build_options(&cli, &Config::default()).unwrap();

        assert!(options.output_sink.unwrap().is_standard());
        assert!(options.error_sink.unwrap().is_standard());
    }

    #[test]
    fn test_build_options_file_sinks() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("out.log");
        let cli = Cli::parse_from([
            "shellac",
            "--stdout-file",
            out.to_str().unwrap(),
            "true",
        ]);
        let options = build_options(&cli, &Config::default()).unwrap();

        assert!(!options.output_sink.unwrap().is_standard());
        assert!(options.error_sink.is_none());
        assert!(out.exists());
    }
}
