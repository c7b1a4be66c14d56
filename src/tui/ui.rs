// ABOUTME: Main TUI rendering function — assembles header, transcript, input, and status bar.
// ABOUTME: Splits the terminal frame into vertical layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::state::TuiState;
use crate::tui::widgets::status::{StatusBarParams, status_line};
use crate::tui::widgets::transcript::transcript_lines;

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &mut TuiState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Transcript
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let header = Line::from(vec![
        Span::styled(
            " monkey",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  Enter evaluate · PgUp/PgDn scroll · Ctrl+C quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    // Transcript
    let transcript_chunk = chunks[1];
    let paragraph = Paragraph::new(transcript_lines(state.transcript.entries(), &state.prompt))
        .wrap(Wrap { trim: false });

    // line_count matches ratatui's own wrapping, so the newest line is never cut off.
    let total_lines = paragraph.line_count(transcript_chunk.width) as u16;
    let max_scroll = total_lines.saturating_sub(transcript_chunk.height);
    state.transcript.clamp_scroll(max_scroll);

    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.transcript.scroll_offset());
    frame.render_widget(paragraph.scroll((scroll, 0)), transcript_chunk);

    // Input
    let input_chunk = chunks[2];
    let focused = state.controller.is_focused();
    let border_style = if focused {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut input_block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(border_style);
    if state.is_submitting() {
        input_block = input_block.title(Span::styled(
            " evaluating... ",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let prompt = format!("{} ", state.prompt);
    let input = Paragraph::new(Line::from(vec![
        Span::styled(
            prompt.clone(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(state.controller.buffer().text().to_string()),
    ]))
    .block(input_block);
    frame.render_widget(input, input_chunk);

    if focused && input_chunk.width > 0 && input_chunk.height > 1 {
        let before = state.controller.buffer().before_cursor();
        let visual_col = UnicodeWidthStr::width(prompt.as_str()) + UnicodeWidthStr::width(before);
        let max_visual_col = input_chunk.width.saturating_sub(1) as usize;
        let cursor_x = input_chunk
            .x
            .saturating_add(visual_col.min(max_visual_col) as u16);
        // +1 for the top border.
        let cursor_y = input_chunk.y.saturating_add(1);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    let status = status_line(&StatusBarParams {
        completed: state.completed,
        failed: state.failed,
        timeout: state.timeout,
        elapsed: state.elapsed(),
        session_start: state.session_start,
        focused,
    });
    frame.render_widget(Paragraph::new(status), chunks[3]);
}
