// ABOUTME: TUI module — ratatui full-screen console for monkeyterm.
// ABOUTME: Transcript pane, single-line input, status bar, and the async event loop driving them.

pub mod input;
pub mod state;
pub mod ui;
pub mod widgets;

use std::future::Future;
use std::io::{self, Stdout};
use std::pin::Pin;
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::time::MissedTickBehavior;

use crate::session::{SessionError, SessionHandle};

pub use input::InputResult;
pub use state::TuiState;

type PendingEvaluation = Pin<Box<dyn Future<Output = Result<String, SessionError>> + Send>>;

/// Take over the terminal and run until the user quits. Returns the final state.
pub async fn run(
    mut state: TuiState,
    session: SessionHandle,
    tick: Duration,
) -> anyhow::Result<TuiState> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut state, &session, tick).await;
    restore_terminal(&mut terminal)?;
    result.map(|_| state)
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut TuiState,
    session: &SessionHandle,
    tick: Duration,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut pending: Option<PendingEvaluation> = None;

    loop {
        terminal.draw(|frame| ui::render(frame, state))?;
        if state.should_quit {
            break;
        }

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match input::handle_key(state, key) {
                        InputResult::Submit(line) => {
                            let session = session.clone();
                            pending = Some(Box::pin(async move { session.evaluate(line).await }));
                        }
                        InputResult::Quit => state.should_quit = true,
                        InputResult::None => {}
                    }
                }
                Some(Ok(Event::Mouse(mouse))) => input::handle_mouse(state, mouse),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            outcome = wait_for(&mut pending), if pending.is_some() => {
                pending = None;
                state.finish(outcome);
            }
            _ = ticker.tick() => {}
        }
    }

    if pending.is_some() {
        tracing::info!("quitting with an evaluation still running");
    }
    Ok(())
}

async fn wait_for(pending: &mut Option<PendingEvaluation>) -> Result<String, SessionError> {
    match pending {
        Some(evaluation) => evaluation.await,
        None => std::future::pending().await,
    }
}
