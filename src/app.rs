// ABOUTME: App orchestrator — wires together config, session worker, transcript, and front end.
// ABOUTME: Runs either the full-screen TUI or the line-oriented plain mode.

use std::io::{self, IsTerminal, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::config::{Config, EvalConfig};
use crate::controller::InputController;
use crate::engine::{Engine, MonkeyEngine};
use crate::session::{SessionHandle, TranscriptLogger};
use crate::transcript::{PlainSink, Transcript};
use crate::tui::{self, TuiState};
use crate::tui::widgets::status::format_duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Tui,
    Plain,
}

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
    mode: Mode,
}

impl App {
    pub fn new(config: Config, mode: Mode) -> Self {
        Self { config, mode }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let session = spawn_session(&self.config.eval)?;
        match self.mode {
            Mode::Tui => self.run_tui(session).await,
            Mode::Plain => self.run_plain(session).await,
        }
    }

    /// The JSONL mirror, when enabled. Failing to open it is logged, not fatal.
    fn transcript_logger(&self) -> Option<TranscriptLogger> {
        if !self.config.log.transcript {
            return None;
        }
        match TranscriptLogger::new() {
            Ok(logger) => {
                tracing::info!(path = %logger.path.display(), "logging transcript");
                Some(logger)
            }
            Err(e) => {
                tracing::warn!("failed to create transcript log: {}", e);
                None
            }
        }
    }

    async fn run_tui(self, session: SessionHandle) -> anyhow::Result<()> {
        let transcript = match self.transcript_logger() {
            Some(logger) => Transcript::with_logger(logger),
            None => Transcript::new(),
        };

        let state = TuiState::new(
            transcript,
            self.config.console.prompt.clone(),
            self.config.eval.timeout(),
        );
        let tick = std::time::Duration::from_millis(self.config.console.tick_millis.max(10));
        let state = tui::run(state, session, tick).await?;

        print_exit_screen(&state);
        Ok(())
    }

    async fn run_plain(self, session: SessionHandle) -> anyhow::Result<()> {
        let interactive = io::stdin().is_terminal();
        let mut sink = PlainSink::new(io::stdout(), self.config.console.prompt.clone(), !interactive);
        if let Some(logger) = self.transcript_logger() {
            sink = sink.with_logger(logger);
        }

        run_plain_loop(&session, BufReader::new(tokio::io::stdin()), &mut sink, interactive).await?;

        if interactive {
            println!();
        }
        Ok(())
    }
}

/// Submit each line of `input` in order until EOF. The prompt is shown only when `interactive`.
pub async fn run_plain_loop<R, W>(
    session: &SessionHandle,
    input: R,
    sink: &mut PlainSink<W>,
    interactive: bool,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut controller = InputController::new();
    let mut lines = input.lines();
    let mut submitted = 0;

    loop {
        if interactive {
            sink.show_prompt()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };
        controller.buffer_mut().set(line);
        if controller.submit(session, sink).await.is_some() {
            submitted += 1;
        }
    }
    tracing::debug!(submitted, "plain input closed");
    Ok(submitted)
}

/// Start the session worker with the bundled Monkey engine.
pub fn spawn_session(eval: &EvalConfig) -> anyhow::Result<SessionHandle> {
    let max_call_depth = eval.max_call_depth;
    SessionHandle::spawn(
        move |interrupt| -> Box<dyn Engine> {
            Box::new(MonkeyEngine::new(interrupt, max_call_depth))
        },
        eval.timeout(),
    )
}

fn print_exit_screen(state: &TuiState) {
    println!();
    println!(
        "  Evaluated {} lines ({} failed) in {}.",
        state.completed,
        state.failed,
        format_duration(state.session_start.elapsed())
    );
    println!();
}
