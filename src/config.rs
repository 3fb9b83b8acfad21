use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::job::PollPolicy;
use crate::retry::RetryPolicy;

/// Retry parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Maximum number of attempts per operation (including the first).
    pub max_attempts: u32,
    /// First backoff delay in seconds (e.g. 0.5 = 500ms).
    pub initial_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
    /// Multiplicative backoff growth per attempt.
    pub backoff_multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_secs: 5.0,
            max_delay_secs: 60,
            backoff_multiplier: 2.0,
        }
    }
}

/// Job polling parameters (optional `[poll]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSettings {
    /// Fixed delay between status queries, in seconds.
    pub interval_secs: u64,
    /// Wall-clock budget per job, in seconds.
    pub timeout_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            timeout_secs: 30 * 60,
        }
    }
}

/// Global configuration loaded from `~/.config/drover/config.toml`, with
/// environment-variable overrides applied on top. Materialized into
/// `RetryPolicy`/`PollPolicy` values once at process start and passed into
/// every call; the algorithms never look configuration up themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DroverConfig {
    /// Optional retry settings; built-in defaults when missing.
    #[serde(default)]
    pub retry: Option<RetrySettings>,
    /// Optional poll settings; built-in defaults when missing.
    #[serde(default)]
    pub poll: Option<PollSettings>,
}

impl DroverConfig {
    /// Retry policy from the `[retry]` section (or defaults), with
    /// `max_delay` clamped to at least `initial_delay`.
    pub fn retry_policy(&self) -> RetryPolicy {
        let s = self.retry.clone().unwrap_or_default();
        let initial = Duration::from_secs_f64(s.initial_delay_secs.max(0.0));
        RetryPolicy {
            max_attempts: s.max_attempts.max(1),
            initial_delay: initial,
            max_delay: Duration::from_secs(s.max_delay_secs).max(initial),
            multiplier: s.backoff_multiplier.max(1.0),
        }
    }

    /// Poll policy from the `[poll]` section (or defaults).
    pub fn poll_policy(&self) -> PollPolicy {
        let s = self.poll.clone().unwrap_or_default();
        PollPolicy {
            interval: Duration::from_secs(s.interval_secs.max(1)),
            timeout: Duration::from_secs(s.timeout_secs),
        }
    }

    /// Apply `DROVER_*` environment overrides on top of the file values:
    /// `DROVER_RETRY_MAX_ATTEMPTS`, `DROVER_RETRY_INITIAL_DELAY_SECS`,
    /// `DROVER_RETRY_MAX_DELAY_SECS`, `DROVER_POLL_INTERVAL_SECS`,
    /// `DROVER_POLL_TIMEOUT_SECS`. Unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        let mut retry = self.retry.take().unwrap_or_default();
        if let Some(v) = env_parse::<u32>("DROVER_RETRY_MAX_ATTEMPTS") {
            retry.max_attempts = v;
        }
        if let Some(v) = env_parse::<f64>("DROVER_RETRY_INITIAL_DELAY_SECS") {
            retry.initial_delay_secs = v;
        }
        if let Some(v) = env_parse::<u64>("DROVER_RETRY_MAX_DELAY_SECS") {
            retry.max_delay_secs = v;
        }
        self.retry = Some(retry);

        let mut poll = self.poll.take().unwrap_or_default();
        if let Some(v) = env_parse::<u64>("DROVER_POLL_INTERVAL_SECS") {
            poll.interval_secs = v;
        }
        if let Some(v) = env_parse::<u64>("DROVER_POLL_TIMEOUT_SECS") {
            poll.timeout_secs = v;
        }
        self.poll = Some(poll);
        self
    }

    /// Load configuration from an explicit path (no default-file creation).
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(toml::from_str(&data)?)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("drover")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists,
/// then apply environment overrides.
pub fn load_or_init() -> Result<DroverConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DroverConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg.with_env_overrides());
    }

    let cfg = DroverConfig::load_from(&path)?;
    Ok(cfg.with_env_overrides())
}
