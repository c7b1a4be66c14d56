// ABOUTME: JSONL transcript logger — appends each transcript entry to a log file.
// ABOUTME: Stores logs in ~/.monkeyterm/transcripts/, one timestamped file per run.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::transcript::{EntryKind, HistoryEntry};

/// A single JSONL record: when the entry was appended, its kind, and its lines.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub kind: EntryKind,
    pub lines: Vec<String>,
}

pub struct TranscriptLogger {
    writer: BufWriter<File>,
    pub path: PathBuf,
}

impl TranscriptLogger {
    /// Open a new log file in the default transcripts directory.
    pub fn new() -> anyhow::Result<Self> {
        Self::new_in_dir(&Config::transcripts_dir())
    }

    /// Create the directory if needed and open a file named with the current timestamp.
    pub fn new_in_dir(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir)?;
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = dir.join(format!("{}.jsonl", timestamp));
        let file = File::options().create(true).append(true).open(&path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn log_entry(&mut self, entry: &HistoryEntry) -> anyhow::Result<()> {
        let record = LogEntry {
            timestamp: Utc::now().to_rfc3339(),
            kind: entry.kind,
            lines: entry.lines.clone(),
        };
        let line = serde_json::to_string(&record)?;
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Transcript, TranscriptSink};

    fn read_records(path: &Path) -> Vec<LogEntry> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn logger_writes_one_json_line_per_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("transcripts");

        let mut logger = TranscriptLogger::new_in_dir(&dir).unwrap();
        logger
            .log_entry(&HistoryEntry::new(EntryKind::Input, "let x = 1;"))
            .unwrap();
        logger
            .log_entry(&HistoryEntry::new(EntryKind::OutputOk, "a\nb"))
            .unwrap();

        let records = read_records(&logger.path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, EntryKind::Input);
        assert_eq!(records[1].lines, vec!["a", "b"]);
        assert!(!records[0].timestamp.is_empty());
    }

    #[test]
    fn kind_is_serialized_in_snake_case() {
        let tmp = tempfile::tempdir().unwrap();
        let mut logger = TranscriptLogger::new_in_dir(tmp.path()).unwrap();
        logger
            .log_entry(&HistoryEntry::new(EntryKind::OutputErr, "boom"))
            .unwrap();

        let content = fs::read_to_string(&logger.path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed["kind"], "output_err");
    }

    #[test]
    fn transcript_mirrors_appends_to_its_logger() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = TranscriptLogger::new_in_dir(tmp.path()).unwrap();
        let path = logger.path.clone();

        let mut transcript = Transcript::with_logger(logger);
        transcript.append(EntryKind::Input, "1 + 1");
        transcript.append(EntryKind::OutputOk, "2");

        let records = read_records(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].lines, vec!["2"]);
    }
}
