// ABOUTME: tracing-subscriber setup for both front ends.
// ABOUTME: The TUI logs to a file so output never lands on the alternate screen; plain mode uses stderr.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Install the global subscriber. RUST_LOG, when set, wins over `level`.
pub fn init(level: &str, target: LogTarget) -> anyhow::Result<()> {
    let from_env = std::env::var("RUST_LOG").ok();
    let filter = build_filter(level, from_env.as_deref())?;

    match target {
        LogTarget::Stderr => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::File(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let file = File::options()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn build_filter(configured: &str, from_env: Option<&str>) -> anyhow::Result<EnvFilter> {
    let directives = from_env
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(configured);
    EnvFilter::try_new(directives)
        .with_context(|| format!("invalid log filter '{}'", directives))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_is_used_without_env() {
        let filter = build_filter("debug", None).unwrap();
        assert_eq!(filter.to_string().to_lowercase(), "debug");
    }

    #[test]
    fn env_overrides_configured_level() {
        let filter = build_filter("info", Some("monkeyterm=trace")).unwrap();
        assert_eq!(filter.to_string().to_lowercase(), "monkeyterm=trace");
    }

    #[test]
    fn blank_env_falls_back_to_configured() {
        let filter = build_filter("warn", Some("  ")).unwrap();
        assert_eq!(filter.to_string().to_lowercase(), "warn");
    }

    #[test]
    fn invalid_level_is_rejected() {
        let err = build_filter("monkeyterm=loud", None).unwrap_err();
        assert!(err.to_string().contains("invalid log filter"));
    }
}
