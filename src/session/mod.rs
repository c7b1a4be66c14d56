// ABOUTME: Session module — one long-lived engine instance per console run.
// ABOUTME: Provides the synchronous Session, its worker-thread handle, and the transcript log.

pub mod log;
pub mod worker;

use crate::engine::Engine;

pub use log::{LogEntry, TranscriptLogger};
pub use worker::{SessionError, SessionHandle};

/// Owns the engine and forwards each line to it verbatim.
///
/// State accumulates across calls, including failed ones, until [`Session::reset`].
pub struct Session {
    engine: Box<dyn Engine>,
    evaluations: u64,
}

impl Session {
    pub fn new(engine: Box<dyn Engine>) -> Self {
        Self {
            engine,
            evaluations: 0,
        }
    }

    /// Evaluate one line. Both arms carry an encoded `captured|value` payload.
    pub fn evaluate(&mut self, line: &str) -> Result<String, String> {
        self.evaluations += 1;
        self.engine.evaluate(line)
    }

    /// Discard every binding the engine has accumulated.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.evaluations = 0;
    }

    /// Number of evaluations since creation or the last reset.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Interrupt, MonkeyEngine};

    fn session() -> Session {
        Session::new(Box::new(MonkeyEngine::new(Interrupt::default(), 64)))
    }

    #[test]
    fn state_persists_across_calls() {
        let mut session = session();
        assert!(session.evaluate("let x = 5;").is_ok());
        assert_eq!(session.evaluate("x;"), Ok("|5".to_string()));
        assert_eq!(session.evaluations(), 2);
    }

    #[test]
    fn state_survives_an_error() {
        let mut session = session();
        session.evaluate("let x = 5;").ok();
        assert!(session.evaluate("x / 0").is_err());
        assert_eq!(session.evaluate("x + 1"), Ok("|6".to_string()));
    }

    #[test]
    fn reset_discards_bindings_and_count() {
        let mut session = session();
        session.evaluate("let x = 5;").ok();
        session.reset();
        assert_eq!(session.evaluations(), 0);
        assert_eq!(
            session.evaluate("x"),
            Err("|NameError: name 'x' is not defined".to_string())
        );
    }
}
