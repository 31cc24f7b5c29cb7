//! Configuration for sra-desk.
//!
//! This module resolves the on-disk location of the persisted defaults file
//! (expanding shell variables like `~`) and holds the runner's timing policy.

use std::time::Duration;

/// Default path for the persisted custom defaults
const DEFAULT_DEFAULTS_PATH: &str = "~/.sra-desk/defaults.yml";

/// Hard ceiling on how long a streamed command may run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// How long to keep reading leftover pipe contents once the process is gone
pub const DEFAULT_REMAINDER_GRACE: Duration = Duration::from_secs(1);

/// Executable spawned at startup to confirm the toolkit is installed
pub const TOOLKIT_CHECK: &[&str] = &["vdb-config", "--version"];

/// Resolves the defaults file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// defaults path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use sra_desk_core::config::get_defaults_path;
///
/// let default_path = get_defaults_path(&None);
/// assert!(default_path.ends_with("defaults.yml"));
///
/// let custom_path = get_defaults_path(&Some("/path/to/defaults.yml".to_string()));
/// assert_eq!(custom_path, "/path/to/defaults.yml");
/// ```
pub fn get_defaults_path(defaults_path_arg: &Option<String>) -> String {
    let defaults_path = match defaults_path_arg {
        Some(defaults_path) => defaults_path,
        None => DEFAULT_DEFAULTS_PATH,
    };

    shellexpand::tilde(defaults_path).to_string()
}

/// Timing policy for the process runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Measured from spawn. Exceeding it kills the process; there is no retry.
    pub timeout: Duration,
    /// Upper bound on the final remainder read after the process exits.
    pub remainder_grace: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            remainder_grace: DEFAULT_REMAINDER_GRACE,
        }
    }
}

impl RunnerConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

/// Renders a ceiling the way it is shown to users, e.g. `5 minutes`.
pub fn describe_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    let (amount, unit) = if secs >= 3600 && secs % 3600 == 0 {
        (secs / 3600, "hour")
    } else if secs >= 60 && secs % 60 == 0 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };

    if amount == 1 {
        format!("{amount} {unit}")
    } else {
        format!("{amount} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_defaults_path_with_custom_path() {
        let custom_path = Some("/custom/path/defaults.yml".to_string());
        let result = get_defaults_path(&custom_path);
        assert_eq!(result, "/custom/path/defaults.yml");
    }

    #[test]
    fn test_get_defaults_path_with_none() {
        let result = get_defaults_path(&None);
        // Should expand the tilde in the default path
        assert!(result.contains("defaults.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_get_defaults_path_with_tilde() {
        let result = get_defaults_path(&Some("~/my-defaults.yml".to_string()));
        assert!(!result.starts_with('~'));
        assert!(result.ends_with("my-defaults.yml"));
    }

    #[test]
    fn test_runner_config_default() {
        let config = RunnerConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.remainder_grace, DEFAULT_REMAINDER_GRACE);
    }

    #[test]
    fn test_runner_config_with_timeout() {
        let config = RunnerConfig::with_timeout(Duration::from_secs(2));
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.remainder_grace, DEFAULT_REMAINDER_GRACE);
    }

    #[test]
    fn test_describe_duration() {
        assert_eq!(describe_duration(DEFAULT_TIMEOUT), "5 minutes");
        assert_eq!(describe_duration(Duration::from_secs(60)), "1 minute");
        assert_eq!(describe_duration(Duration::from_secs(7200)), "2 hours");
        assert_eq!(describe_duration(Duration::from_secs(90)), "90 seconds");
        assert_eq!(describe_duration(Duration::from_secs(1)), "1 second");
    }
}
