//! Error types for shellac
//!
//! Provides structured error types with suggestions for common issues.

use serde::Serialize;
use thiserror::Error;

/// Fixed message carried by [`ShellError::Timeout`]
pub const TIMEOUT_MESSAGE: &str = "process was expired";

/// Main error type for shell executions
#[derive(Error, Debug)]
pub enum ShellError {
    /// The command ran to completion with a non-zero status
    #[error("Command exited with status {code}")]
    Exit {
        code: i32,
        /// Captured standard output
        output: String,
        /// Captured standard error
        error: String,
    },

    /// The configured timeout elapsed and the process was killed
    #[error("Command timed out: {message}")]
    Timeout { message: String },

    /// The shell process could not be created
    #[error("Failed to launch shell {shell}: {error}")]
    Launch { shell: String, error: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// Build a timeout error carrying the fixed message
    pub fn timeout() -> Self {
        ShellError::Timeout {
            message: TIMEOUT_MESSAGE.to_string(),
        }
    }

    /// Exit code of the child when it is known
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ShellError::Exit { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ShellError::Timeout { .. })
    }
}

/// Serializable error info for JSON output
#[derive(Debug, Serialize, Clone)]
pub struct ErrorInfo {
    pub message: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl From<&ShellError> for ErrorInfo {
    fn from(err: &ShellError) -> Self {
        match err {
            ShellError::Exit {
                code,
                output,
                error,
            } => ErrorInfo {
                message: err.to_string(),
                error_type: "exit".to_string(),
                suggestion: suggest_fix(error),
                exit_code: Some(*code),
                stdout: Some(output.clone()),
                stderr: Some(error.clone()),
            },
            ShellError::Timeout { message } => ErrorInfo {
                message: message.clone(),
                error_type: "timeout".to_string(),
                suggestion: Some(
                    "Try increasing the timeout or checking if the command hangs".to_string(),
                ),
                exit_code: None,
                stdout: None,
                stderr: None,
            },
            ShellError::Launch { shell, error } => ErrorInfo {
                message: format!("Failed to launch shell {}", shell),
                error_type: "launch_failed".to_string(),
                suggestion: Some(format!("Check that the shell exists and is executable: {}", error)),
                exit_code: None,
                stdout: None,
                stderr: None,
            },
            ShellError::Config(msg) => ErrorInfo {
                message: format!("Configuration error: {}", msg),
                error_type: "config_error".to_string(),
                suggestion: Some("Check your shellac configuration file".to_string()),
                exit_code: None,
                stdout: None,
                stderr: None,
            },
            ShellError::Io(e) => ErrorInfo {
                message: format!("IO error: {}", e),
                error_type: "io_error".to_string(),
                suggestion: None,
                exit_code: None,
                stdout: None,
                stderr: None,
            },
        }
    }
}

/// Suggest fixes for common shell error patterns found in stderr
pub fn suggest_fix(stderr: &str) -> Option<String> {
    if stderr.contains("Permission denied") {
        return Some(
            "Permission denied. Check file permissions or run with appropriate access.".to_string(),
        );
    }

    if stderr.contains("command not found") || stderr.contains("not found") {
        return Some("Required command not found. Check PATH and dependencies.".to_string());
    }

    // cd into a missing directory reports this too
    if stderr.contains("No such file") || stderr.contains("can't cd") {
        return Some("File or directory not found. Check the working directory and paths.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_error() {
        let err = ShellError::Exit {
            code: 2,
            output: String::new(),
            error: "cd: nowhere: No such file or directory".to_string(),
        };
        assert_eq!(err.to_string(), "Command exited with status 2");
        assert_eq!(err.exit_code(), Some(2));
        assert!(!err.is_timeout());

        let info = ErrorInfo::from(&err);
        assert_eq!(info.error_type, "exit");
        assert_eq!(info.exit_code, Some(2));
        assert!(info.suggestion.unwrap().contains("directory"));
    }

    #[test]
    fn test_timeout_error() {
        let err = ShellError::timeout();
        assert!(err.is_timeout());
        assert_eq!(err.exit_code(), None);
        assert!(err.to_string().contains(TIMEOUT_MESSAGE));

        let info = ErrorInfo::from(&err);
        assert_eq!(info.error_type, "timeout");
        assert_eq!(info.message, TIMEOUT_MESSAGE);
        assert!(info.stdout.is_none());
    }

    #[test]
    fn test_launch_error() {
        let err = ShellError::Launch {
            shell: "/no/such/sh".to_string(),
            error: "No such file or directory".to_string(),
        };
        assert!(err.to_string().contains("/no/such/sh"));

        let info = ErrorInfo::from(&err);
        assert_eq!(info.error_type, "launch_failed");
    }

    #[test]
    fn test_suggest_fix_permission_denied() {
        let suggestion = suggest_fix("sh: ./run.sh: Permission denied");
        assert!(suggestion.unwrap().contains("Permission"));
    }

    #[test]
    fn test_suggest_fix_command_not_found() {
        let suggestion = suggest_fix("sh: 1: frobnicate: not found");
        assert!(suggestion.unwrap().contains("PATH"));
    }

    #[test]
    fn test_suggest_fix_no_match() {
        assert!(suggest_fix("some random error").is_none());
    }

    #[test]
    fn test_error_info_serialization() {
        let err = ShellError::Exit {
            code: 1,
            output: "out".to_string(),
            error: "err".to_string(),
        };
        let json = serde_json::to_string(&ErrorInfo::from(&err)).unwrap();
        assert!(json.contains("\"exit_code\":1"));
        assert!(json.contains("\"stderr\":\"err\""));
    }

    #[test]
    fn test_error_info_skips_empty_fields() {
        let json = serde_json::to_string(&ErrorInfo::from(&ShellError::timeout())).unwrap();
        assert!(!json.contains("exit_code"));
        assert!(!json.contains("stdout"));
        assert!(!json.contains("stderr"));
    }
}
