use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};

// =============================================================================
// Environment variables
// =============================================================================

/// Request timeout in whole seconds
pub const REQUEST_TIMEOUT_ENV: &str = "VERSIONATOR_REQUEST_TIMEOUT";

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Process configuration, loaded once at startup and passed down explicitly
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Total timeout applied to every upstream request
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Reads configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(std::env::var(REQUEST_TIMEOUT_ENV).ok())
    }

    fn from_vars(request_timeout: Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = request_timeout {
            let seconds = parse_timeout_secs(&raw)
                .with_context(|| format!("Invalid {}: '{}'", REQUEST_TIMEOUT_ENV, raw))?;
            config.request_timeout = Duration::from_secs(seconds);
        }

        Ok(config)
    }

    /// Replaces the request timeout, rejecting zero
    pub fn with_timeout_secs(mut self, seconds: u64) -> anyhow::Result<Self> {
        if seconds < 1 {
            bail!("Timeout must be at least 1 second");
        }
        self.request_timeout = Duration::from_secs(seconds);
        Ok(self)
    }
}

fn parse_timeout_secs(raw: &str) -> anyhow::Result<u64> {
    let seconds: u64 = raw.trim().parse().context("expected a whole number of seconds")?;
    if seconds < 1 {
        bail!("timeout must be at least 1 second");
    }
    Ok(seconds)
}

/// Returns the path to the data directory for versionator.
/// Uses $XDG_DATA_HOME/versionator if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/versionator,
/// or ./versionator if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("versionator.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("versionator")
}
