//! Configuration for the work/break schedule.
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TermdoroError};

pub const DEFAULT_WORK_MINUTES: i64 = 25;
pub const DEFAULT_BREAK_MINUTES: i64 = 5;
pub const DEFAULT_ROUNDS: i64 = 1;

/// Kind of a timed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Work,
    Break,
}

impl SessionKind {
    /// Label used on the countdown line and in progress messages.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Work => "WORK",
            Self::Break => "BREAK",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated settings for one run. Values are never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    pub work_minutes: u64,
    pub break_minutes: u64,
    pub rounds: u64,
    pub auto_advance: bool,
    pub bell_enabled: bool,
    pub start_with: SessionKind,
}

impl TimerConfig {
    /// Builds a config from raw values, clamping negatives to zero.
    pub fn new(
        work_minutes: i64,
        break_minutes: i64,
        rounds: i64,
        auto_advance: bool,
        bell_enabled: bool,
        start_with: SessionKind,
    ) -> Self {
        Self {
            work_minutes: clamp_non_negative(work_minutes),
            break_minutes: clamp_non_negative(break_minutes),
            rounds: clamp_non_negative(rounds),
            auto_advance,
            bell_enabled,
            start_with,
        }
    }

    pub fn work_seconds(&self) -> u64 {
        self.work_minutes.saturating_mul(60)
    }

    pub fn break_seconds(&self) -> u64 {
        self.break_minutes.saturating_mul(60)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_WORK_MINUTES,
            DEFAULT_BREAK_MINUTES,
            DEFAULT_ROUNDS,
            false,
            true,
            SessionKind::Work,
        )
    }
}

fn clamp_non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Optional defaults read from the JSON config file. Command-line flags win.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub work_minutes: Option<i64>,
    #[serde(default)]
    pub break_minutes: Option<i64>,
    #[serde(default)]
    pub rounds: Option<i64>,
    #[serde(default)]
    pub auto: Option<bool>,
    #[serde(default)]
    pub bell: Option<bool>,
    #[serde(default)]
    pub start_with: Option<SessionKind>,
}

impl FileConfig {
    /// Reads the config file at `path`. A missing file yields empty defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using built-in defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| TermdoroError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config = serde_json::from_str(&content).map_err(|source| TermdoroError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }
}

/// `$HOME/.config/termdoro/config.json`, or a file in the working directory
/// when `HOME` is not set.
pub fn default_config_path() -> PathBuf {
    if let Some(home) = env::var_os("HOME") {
        PathBuf::from(home)
            .join(".config")
            .join("termdoro")
            .join("config.json")
    } else {
        PathBuf::from("termdoro-config.json")
    }
}
