// ABOUTME: Status bar widget — evaluation counts, timeout, session age, and the busy indicator.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use std::time::{Duration, Instant};

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

pub struct StatusBarParams {
    pub completed: u64,
    pub failed: u64,
    pub timeout: Duration,
    /// Running time of the in-flight evaluation, if any.
    pub elapsed: Option<Duration>,
    pub session_start: Instant,
    pub focused: bool,
}

/// Render the status bar line.
pub fn status_line(params: &StatusBarParams) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let white = Style::default().fg(Color::White);

    let timeout = if params.timeout.is_zero() {
        "no timeout ".to_string()
    } else {
        format!("timeout {} ", format_duration(params.timeout))
    };

    let mut spans = vec![
        Span::styled(" monkey ", Style::default().fg(Color::Cyan)),
        Span::styled("| ", dim),
        Span::styled(format!("{} evaluated ", params.completed), white),
    ];
    if params.failed > 0 {
        spans.push(Span::styled(
            format!("({} failed) ", params.failed),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::styled("| ", dim));
    spans.push(Span::styled(timeout, white));
    spans.push(Span::styled("| ", dim));
    spans.push(Span::styled(
        format!("{} ", format_duration(params.session_start.elapsed())),
        white,
    ));

    if let Some(elapsed) = params.elapsed {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(
            format!("evaluating... {} ", format_duration(elapsed)),
            Style::default().fg(Color::Yellow),
        ));
    }

    if !params.focused {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled("scrolling (click or type to edit) ", dim));
    }

    Line::from(spans)
}

/// Compact duration: "850ms", "12s", "3m 07s", "1h 02m".
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else if secs >= 1 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
