// ABOUTME: Entry point for monkey — an interactive Monkey console in the terminal.
// ABOUTME: Parses CLI args, loads config, sets up logging, and launches the app.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use monkeyterm::app::{App, Mode};
use monkeyterm::config::Config;
use monkeyterm::logging::{self, LogTarget};

#[derive(Parser, Debug)]
#[command(name = "monkey")]
#[command(version)]
#[command(about = "Interactive console for the Monkey language.", long_about = None)]
struct Cli {
    /// Line-oriented mode instead of the full-screen console (implied when not on a terminal).
    #[arg(long)]
    plain: bool,

    /// Seconds before an evaluation is interrupted; 0 disables the limit.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Config file to use instead of ~/.monkeyterm/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "monkeyterm=trace". RUST_LOG takes precedence.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Write every transcript entry to ~/.monkeyterm/transcripts/.
    #[arg(long)]
    transcript_log: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Flags given on the command line win over the config file.
    fn apply(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout {
            config.eval.timeout_seconds = timeout;
        }
        if let Some(level) = &self.log_level {
            config.log.level = level.clone();
        }
        if self.transcript_log {
            config.log.transcript = true;
        }
    }

    fn mode(&self) -> Mode {
        if self.plain || !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
            Mode::Plain
        } else {
            Mode::Tui
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    let mode = cli.mode();

    let target = match mode {
        Mode::Tui => LogTarget::File(Config::logs_dir().join("monkeyterm.log")),
        Mode::Plain => LogTarget::Stderr,
    };
    logging::init(&config.log.level, target)?;
    tracing::debug!(?mode, ?config, "starting");

    App::new(config, mode).run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "monkey",
            "--timeout",
            "0",
            "--log-level",
            "debug",
            "--transcript-log",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.eval.timeout_seconds, 0);
        assert_eq!(config.log.level, "debug");
        assert!(config.log.transcript);
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let cli = Cli::parse_from(["monkey"]);
        let mut config = Config::default();
        config.eval.timeout_seconds = 9;
        cli.apply(&mut config);
        assert_eq!(config.eval.timeout_seconds, 9);
        assert_eq!(config.log.level, "info");
        assert!(!config.log.transcript);
    }

    #[test]
    fn plain_flag_forces_plain_mode() {
        let cli = Cli::parse_from(["monkey", "--plain"]);
        assert_eq!(cli.mode(), Mode::Plain);
    }
}
