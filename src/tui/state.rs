// ABOUTME: TUI state — the transcript, the input controller, and status-bar bookkeeping.
// ABOUTME: Everything the renderer needs lives here; the event loop only mutates it.

use std::time::{Duration, Instant};

use crate::controller::{InputController, Phase};
use crate::session::SessionError;
use crate::transcript::Transcript;

/// Full TUI application state.
pub struct TuiState {
    pub transcript: Transcript,
    pub controller: InputController,
    pub prompt: String,
    pub timeout: Duration,
    /// Submissions that have finished, successfully or not.
    pub completed: u64,
    pub failed: u64,
    pub session_start: Instant,
    /// Set while a submission is in flight.
    pub submitted_at: Option<Instant>,
    pub should_quit: bool,
}

impl TuiState {
    pub fn new(transcript: Transcript, prompt: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transcript,
            controller: InputController::new(),
            prompt: prompt.into(),
            timeout,
            completed: 0,
            failed: 0,
            session_start: Instant::now(),
            submitted_at: None,
            should_quit: false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.controller.phase() == Phase::Submitting
    }

    /// Commit the input buffer into the transcript. Returns the line to evaluate.
    pub fn commit(&mut self) -> Option<String> {
        let line = self.controller.commit(&mut self.transcript)?;
        self.submitted_at = Some(Instant::now());
        Some(line)
    }

    /// Route a finished evaluation into the transcript.
    pub fn finish(&mut self, outcome: Result<String, SessionError>) {
        self.completed += 1;
        if outcome.is_err() {
            self.failed += 1;
        }
        self.controller.finish(outcome, &mut self.transcript);
        self.submitted_at = None;
    }

    /// How long the in-flight submission has been running.
    pub fn elapsed(&self) -> Option<Duration> {
        self.submitted_at.map(|started| started.elapsed())
    }
}
