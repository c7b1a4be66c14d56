// ABOUTME: Configuration loading for monkeyterm.
// ABOUTME: Reads ~/.monkeyterm/config.toml (or an explicit path); CLI flags override it later.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub eval: EvalConfig,
    pub console: ConsoleConfig,
    pub log: LogConfig,
}

/// Evaluation limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Seconds before a running evaluation is interrupted. 0 disables the limit.
    pub timeout_seconds: u64,
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 5,
            max_call_depth: 512,
        }
    }
}

impl EvalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub prompt: String,
    /// Redraw interval of the TUI while idle.
    pub tick_millis: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: ">>>".to_string(),
            tick_millis: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when RUST_LOG is unset.
    pub level: String,
    /// Write every transcript entry to a JSONL file.
    pub transcript: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            transcript: false,
        }
    }
}

impl Config {
    /// Load config from ~/.monkeyterm/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load config from an explicit path. A missing file is an error here.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Root of every file monkeyterm writes.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".monkeyterm")
    }

    pub fn config_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    pub fn logs_dir() -> PathBuf {
        Self::home_dir().join("logs")
    }

    pub fn transcripts_dir() -> PathBuf {
        Self::home_dir().join("transcripts")
    }
}
