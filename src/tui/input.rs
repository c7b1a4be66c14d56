// ABOUTME: Keyboard and mouse handling for the TUI — translates events into state changes.
// ABOUTME: Enter commits through the controller; clicks anywhere give the input focus back.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::tui::state::TuiState;

const PAGE_SCROLL: u16 = 10;
const WHEEL_SCROLL: u16 = 3;

/// The result of processing an input event.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// No action needed.
    None,
    /// A line was committed and should be evaluated.
    Submit(String),
    /// User wants to quit.
    Quit,
}

/// Process a key event against the current TUI state and return the resulting action.
pub fn handle_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
    {
        return InputResult::Quit;
    }

    // PageUp/PageDown always scroll, regardless of focus or phase.
    if handle_scroll_key(state, key.code) {
        return InputResult::None;
    }

    if key.code == KeyCode::Esc {
        state.controller.blur();
        return InputResult::None;
    }

    // With the transcript focused, arrows scroll line by line; anything else refocuses.
    if !state.controller.is_focused() {
        match key.code {
            KeyCode::Up => {
                state.transcript.scroll_up(1);
                return InputResult::None;
            }
            KeyCode::Down => {
                state.transcript.scroll_down(1);
                return InputResult::None;
            }
            _ => state.controller.focus(),
        }
    }

    match key.code {
        KeyCode::Enter => match state.commit() {
            Some(line) => InputResult::Submit(line),
            None => InputResult::None,
        },
        // Only plain typing inserts; Ctrl and Alt chords are not text.
        KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
            state.controller.buffer_mut().insert(c);
            InputResult::None
        }
        KeyCode::Backspace => {
            state.controller.buffer_mut().backspace();
            InputResult::None
        }
        KeyCode::Delete => {
            state.controller.buffer_mut().delete();
            InputResult::None
        }
        KeyCode::Left => {
            state.controller.buffer_mut().move_left();
            InputResult::None
        }
        KeyCode::Right => {
            state.controller.buffer_mut().move_right();
            InputResult::None
        }
        KeyCode::Home => {
            state.controller.buffer_mut().move_home();
            InputResult::None
        }
        KeyCode::End => {
            state.controller.buffer_mut().move_end();
            InputResult::None
        }
        KeyCode::Up => {
            state.controller.recall_previous();
            InputResult::None
        }
        KeyCode::Down => {
            state.controller.recall_next();
            InputResult::None
        }
        _ => InputResult::None,
    }
}

fn handle_scroll_key(state: &mut TuiState, key: KeyCode) -> bool {
    match key {
        KeyCode::PageUp => {
            state.transcript.scroll_up(PAGE_SCROLL);
            true
        }
        KeyCode::PageDown => {
            state.transcript.scroll_down(PAGE_SCROLL);
            true
        }
        _ => false,
    }
}

/// Wheel scrolls the transcript; a click anywhere focuses the input.
pub fn handle_mouse(state: &mut TuiState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => state.transcript.scroll_up(WHEEL_SCROLL),
        MouseEventKind::ScrollDown => state.transcript.scroll_down(WHEEL_SCROLL),
        MouseEventKind::Down(_) => state.controller.focus(),
        _ => {}
    }
}
