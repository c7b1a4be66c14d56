// ABOUTME: Transcript widget — renders history entries into styled ratatui Lines.
// ABOUTME: Input echo gets the prompt marker, ok output is plain, errors are red.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::transcript::{EntryKind, HistoryEntry};

/// Render transcript entries into display lines, one per entry line.
pub fn transcript_lines(entries: &[HistoryEntry], prompt: &str) -> Vec<Line<'static>> {
    let prompt_style = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let continuation = " ".repeat(prompt.chars().count() + 1);

    let mut lines = Vec::new();
    for entry in entries {
        match entry.kind {
            EntryKind::Input => {
                for (i, text) in entry.lines.iter().enumerate() {
                    let marker = if i == 0 {
                        Span::styled(format!("{} ", prompt), prompt_style)
                    } else {
                        Span::raw(continuation.clone())
                    };
                    lines.push(Line::from(vec![marker, Span::raw(text.clone())]));
                }
            }
            EntryKind::OutputOk => {
                lines.extend(entry.lines.iter().map(|text| Line::from(text.clone())));
            }
            EntryKind::OutputErr => {
                let style = Style::default().fg(Color::Red);
                lines.extend(
                    entry
                        .lines
                        .iter()
                        .map(|text| Line::from(Span::styled(text.clone(), style))),
                );
            }
        }
    }
    lines
}
