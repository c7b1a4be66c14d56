// ABOUTME: InputController — the Idle/Submitting state machine behind the input field.
// ABOUTME: Turns a committed line into a session call and routes the decoded result to a sink.

pub mod buffer;

use crate::protocol;
use crate::session::{SessionError, SessionHandle};
use crate::transcript::{EntryKind, TranscriptSink};

pub use buffer::InputBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
}

/// Owns the input field, its focus, and the recall history.
#[derive(Debug)]
pub struct InputController {
    buffer: InputBuffer,
    phase: Phase,
    focused: bool,
    history: Vec<String>,
    /// Index into `history` while recalling; None when editing a fresh line.
    recall: Option<usize>,
    /// What was typed before recall started, restored when stepping past the newest entry.
    draft: String,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

impl InputController {
    pub fn new() -> Self {
        Self {
            buffer: InputBuffer::new(),
            phase: Phase::Idle,
            focused: true,
            history: Vec::new(),
            recall: None,
            draft: String::new(),
        }
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut InputBuffer {
        &mut self.buffer
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Give focus back to the input. Allowed in any phase.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Start a submission from the current buffer.
    ///
    /// Returns the line to evaluate, or None when the buffer is blank or a
    /// submission is already in flight. In both of those cases nothing changes.
    pub fn commit<S: TranscriptSink + ?Sized>(&mut self, sink: &mut S) -> Option<String> {
        if self.phase == Phase::Submitting || self.buffer.is_blank() {
            return None;
        }

        let line = self.buffer.take();
        sink.append(EntryKind::Input, &line);
        if self.history.last() != Some(&line) {
            self.history.push(line.clone());
        }
        self.recall = None;
        self.draft.clear();
        self.phase = Phase::Submitting;
        tracing::debug!(line = %line, "submitting");
        Some(line)
    }

    /// Render the outcome of the in-flight submission and return to Idle.
    pub fn finish<S: TranscriptSink + ?Sized>(
        &mut self,
        outcome: Result<String, SessionError>,
        sink: &mut S,
    ) {
        match outcome {
            Ok(encoded) => append_decoded(sink, &encoded, EntryKind::OutputOk),
            Err(SessionError::Evaluation(encoded)) => {
                append_decoded(sink, &encoded, EntryKind::OutputErr)
            }
            Err(err) => sink.append(EntryKind::OutputErr, &err.to_string()),
        }
        self.phase = Phase::Idle;
    }

    /// Commit, evaluate, and finish in one step. Returns the submitted line.
    pub async fn submit<S: TranscriptSink + ?Sized>(
        &mut self,
        session: &SessionHandle,
        sink: &mut S,
    ) -> Option<String> {
        let line = self.commit(sink)?;
        let outcome = session.evaluate(line.clone()).await;
        self.finish(outcome, sink);
        Some(line)
    }

    /// Step back through submitted lines.
    pub fn recall_previous(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.recall {
            None => {
                self.draft = self.buffer.text().to_string();
                self.history.len() - 1
            }
            Some(i) => i.saturating_sub(1),
        };
        self.recall = Some(index);
        self.buffer.set(self.history[index].as_str());
    }

    /// Step forward; past the newest line the pre-recall draft comes back.
    pub fn recall_next(&mut self) {
        let Some(i) = self.recall else {
            return;
        };
        if i + 1 < self.history.len() {
            self.recall = Some(i + 1);
            self.buffer.set(self.history[i + 1].as_str());
        } else {
            self.recall = None;
            self.buffer.set(std::mem::take(&mut self.draft));
        }
    }
}

fn append_decoded<S: TranscriptSink + ?Sized>(sink: &mut S, raw: &str, value_kind: EntryKind) {
    match protocol::decode(raw) {
        Ok(decoded) => {
            if !decoded.captured_output.is_empty() {
                sink.append(EntryKind::OutputOk, &decoded.captured_output);
            }
            sink.append(value_kind, &decoded.value);
        }
        Err(err) => {
            tracing::warn!(raw = %raw, "undecodable engine result: {}", err);
            sink.append(EntryKind::OutputErr, &format!("ProtocolError: {}", err));
        }
    }
}
