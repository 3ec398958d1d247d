//! Configuration model for shellac
//!
//! Defines the structure for XDG-compliant layered configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ShellError;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Default settings applied to every execution
    #[serde(default)]
    pub defaults: Defaults,
}

/// Default settings applied to every execution
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Shell executable, absolute path or a name looked up on `PATH`
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Directory commands run in
    #[serde(default = "default_working_dir")]
    pub working_dir: String,

    /// Timeout in milliseconds (unset = no timeout)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Interval between liveness probes in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long output is drained after exit, in milliseconds
    #[serde(default = "default_drain_grace_ms")]
    pub drain_grace_ms: u64,
}

fn default_shell() -> String {
    "/bin/sh".to_string()
}

fn default_working_dir() -> String {
    ".".to_string()
}

fn default_poll_interval_ms() -> u64 {
    10
}

fn default_drain_grace_ms() -> u64 {
    1000
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            working_dir: default_working_dir(),
            timeout_ms: None,
            poll_interval_ms: default_poll_interval_ms(),
            drain_grace_ms: default_drain_grace_ms(),
        }
    }
}

impl Defaults {
    /// Configured timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Liveness polling interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Drain grace period after exit
    pub fn drain_grace(&self) -> Duration {
        Duration::from_millis(self.drain_grace_ms)
    }
}

impl Config {
    /// Reject values the executor cannot work with
    pub fn validate(&self) -> Result<(), ShellError> {
        if self.defaults.shell.trim().is_empty() {
            return Err(ShellError::Config("defaults.shell must not be empty".to_string()));
        }
        if self.defaults.poll_interval_ms == 0 {
            return Err(ShellError::Config(
                "defaults.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.defaults.shell, "/bin/sh");
        assert_eq!(config.defaults.working_dir, ".");
        assert!(config.defaults.timeout().is_none());
        assert_eq!(config.defaults.poll_interval(), Duration::from_millis(10));
        assert_eq!(config.defaults.drain_grace(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
            [defaults]
            timeout_ms = 1500
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.defaults.timeout(), Some(Duration::from_millis(1500)));
        // Defaults should still apply
        assert_eq!(config.defaults.shell, "/bin/sh");
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
            [defaults]
            shell = "bash"
            working_dir = "/tmp"
            timeout_ms = 60000
            poll_interval_ms = 25
            drain_grace_ms = 250
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.defaults.shell, "bash");
        assert_eq!(config.defaults.working_dir, "/tmp");
        assert_eq!(config.defaults.poll_interval(), Duration::from_millis(25));
        assert_eq!(config.defaults.drain_grace(), Duration::from_millis(250));
    }

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let mut config = Config::default();
        config.defaults.poll_interval_ms = 0;
        assert!(matches!(config.validate(), Err(ShellError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_shell() {
        let mut config = Config::default();
        config.defaults.shell = "  ".to_string();
        assert!(matches!(config.validate(), Err(ShellError::Config(_))));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();

        // Should be able to deserialize what we serialized
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.defaults.timeout_ms.is_none());
    }
}
