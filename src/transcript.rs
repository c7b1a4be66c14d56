// ABOUTME: Append-only transcript of console entries and the sinks that display them.
// ABOUTME: Transcript backs the TUI; PlainSink writes entries to a line-oriented stream.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::session::TranscriptLogger;

/// Visual category of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Input,
    OutputOk,
    OutputErr,
}

/// One immutable block of the transcript, already split into display lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub kind: EntryKind,
    pub lines: Vec<String>,
}

impl HistoryEntry {
    pub fn new(kind: EntryKind, text: &str) -> Self {
        Self {
            kind,
            lines: split_lines(text),
        }
    }
}

/// Split on line breaks, keeping empty segments. "a\n\nb" yields three lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Anything the controller can append entries to.
pub trait TranscriptSink {
    /// Append one entry. Calls are recorded in the order they are made.
    fn append(&mut self, kind: EntryKind, text: &str);
}

/// In-memory transcript rendered by the TUI.
#[derive(Default)]
pub struct Transcript {
    entries: Vec<HistoryEntry>,
    /// Lines scrolled up from the bottom; 0 follows the newest entry.
    scroll_offset: u16,
    logger: Option<TranscriptLogger>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror every appended entry to a JSONL log.
    pub fn with_logger(logger: TranscriptLogger) -> Self {
        Self {
            logger: Some(logger),
            ..Self::default()
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Clamp the offset to what the rendered content allows.
    pub fn clamp_scroll(&mut self, max_offset: u16) {
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }
}

impl TranscriptSink for Transcript {
    fn append(&mut self, kind: EntryKind, text: &str) {
        let entry = HistoryEntry::new(kind, text);
        if let Some(logger) = self.logger.as_mut()
            && let Err(e) = logger.log_entry(&entry)
        {
            tracing::warn!("failed to write transcript log: {}", e);
        }
        self.entries.push(entry);
        self.scroll_offset = 0;
    }
}

/// Prefix marking error lines when there is no colour to do it.
pub const PLAIN_ERROR_PREFIX: &str = "! ";

/// Line-oriented sink for plain mode.
pub struct PlainSink<W: Write> {
    out: W,
    prompt: String,
    /// Echo input entries; only useful when stdin is not a terminal.
    echo_input: bool,
    logger: Option<TranscriptLogger>,
}

impl<W: Write> PlainSink<W> {
    pub fn new(out: W, prompt: impl Into<String>, echo_input: bool) -> Self {
        Self {
            out,
            prompt: prompt.into(),
            echo_input,
            logger: None,
        }
    }

    /// Mirror every appended entry to a JSONL log, echoed or not.
    pub fn with_logger(mut self, logger: TranscriptLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the prompt without a newline, for interactive use.
    pub fn show_prompt(&mut self) -> std::io::Result<()> {
        write!(self.out, "{} ", self.prompt)?;
        self.out.flush()
    }

    fn write_entry(&mut self, entry: &HistoryEntry) -> std::io::Result<()> {
        for line in &entry.lines {
            match entry.kind {
                EntryKind::Input => writeln!(self.out, "{} {}", self.prompt, line)?,
                EntryKind::OutputOk => writeln!(self.out, "{}", line)?,
                EntryKind::OutputErr => writeln!(self.out, "{}{}", PLAIN_ERROR_PREFIX, line)?,
            }
        }
        self.out.flush()
    }
}

impl<W: Write> TranscriptSink for PlainSink<W> {
    fn append(&mut self, kind: EntryKind, text: &str) {
        let entry = HistoryEntry::new(kind, text);
        if let Some(logger) = self.logger.as_mut()
            && let Err(e) = logger.log_entry(&entry)
        {
            tracing::warn!("failed to write transcript log: {}", e);
        }
        if kind == EntryKind::Input && !self.echo_input {
            return;
        }
        if let Err(e) = self.write_entry(&entry) {
            tracing::warn!("failed to write to output: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_line_breaks_give_three_lines_in_order() {
        let entry = HistoryEntry::new(EntryKind::OutputOk, "one\ntwo\nthree");
        assert_eq!(entry.lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn carriage_returns_are_stripped_and_blank_lines_kept() {
        assert_eq!(split_lines("a\r\n\r\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn identical_appends_make_distinct_entries() {
        let mut transcript = Transcript::new();
        transcript.append(EntryKind::OutputOk, "same");
        transcript.append(EntryKind::OutputOk, "same");
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn append_scrolls_back_to_bottom() {
        let mut transcript = Transcript::new();
        transcript.append(EntryKind::Input, "1");
        transcript.scroll_up(5);
        assert_eq!(transcript.scroll_offset(), 5);
        transcript.append(EntryKind::OutputOk, "1");
        assert_eq!(transcript.scroll_offset(), 0);
    }

    #[test]
    fn scroll_down_saturates_and_clamp_limits() {
        let mut transcript = Transcript::new();
        transcript.scroll_down(3);
        assert_eq!(transcript.scroll_offset(), 0);
        transcript.scroll_up(30);
        transcript.clamp_scroll(12);
        assert_eq!(transcript.scroll_offset(), 12);
    }

    #[test]
    fn plain_sink_prefixes_errors_and_skips_echo() {
        let mut sink = PlainSink::new(Vec::new(), ">>>", false);
        sink.append(EntryKind::Input, "1 / 0");
        sink.append(EntryKind::OutputOk, "out");
        sink.append(EntryKind::OutputErr, "ZeroDivisionError: division by zero");
        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, "out\n! ZeroDivisionError: division by zero\n");
    }

    #[test]
    fn plain_sink_echoes_input_with_prompt() {
        let mut sink = PlainSink::new(Vec::new(), ">>>", true);
        sink.append(EntryKind::Input, "let x = 1;");
        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, ">>> let x = 1;\n");
    }

    #[test]
    fn plain_sink_logs_every_entry_even_when_not_echoed() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = TranscriptLogger::new_in_dir(tmp.path()).unwrap();
        let path = logger.path.clone();
        let mut sink = PlainSink::new(Vec::new(), ">>>", false).with_logger(logger);
        sink.append(EntryKind::Input, "print(1); x");
        sink.append(EntryKind::OutputOk, "1");
        sink.append(EntryKind::OutputErr, "NameError: name 'x' is not defined");

        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, "1\n! NameError: name 'x' is not defined\n");

        let records: Vec<serde_json::Value> = std::fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let kinds: Vec<&str> = records.iter().map(|r| r["kind"].as_str().unwrap()).collect();
        assert_eq!(kinds, vec!["input", "output_ok", "output_err"]);
        assert_eq!(records[0]["lines"][0], "print(1); x");
    }
}
