// ABOUTME: Evaluation engine seam: the Engine trait plus the bundled Monkey interpreter.
// ABOUTME: Engines return results already encoded as "captured_output|value".

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod token;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::protocol;

use self::eval::Evaluator;
use self::lexer::Lexer;
use self::object::Env;
use self::parser::Parser;

/// An opaque evaluator the console drives.
///
/// `Ok` carries an encoded success result and `Err` an encoded failure. Both use the
/// two-field wire format understood by [`protocol::decode`]. State such as bindings
/// persists between calls until [`Engine::reset`].
pub trait Engine {
    fn evaluate(&mut self, source: &str) -> Result<String, String>;

    /// Drop all accumulated state.
    fn reset(&mut self);
}

/// Shared cancellation flag. Engines poll it while they run.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct MonkeyEngine {
    env: Env,
    interrupt: Interrupt,
    max_call_depth: usize,
}

impl MonkeyEngine {
    pub fn new(interrupt: Interrupt, max_call_depth: usize) -> Self {
        Self {
            env: Env::new(),
            interrupt,
            max_call_depth,
        }
    }
}

impl Engine for MonkeyEngine {
    fn evaluate(&mut self, source: &str) -> Result<String, String> {
        let program = match Parser::new(Lexer::new(source)).parse() {
            Ok(program) => program,
            Err(errors) => {
                let message = errors
                    .iter()
                    .map(|err| err.to_string())
                    .collect::<Vec<_>>()
                    .join("\n");
                return Err(protocol::encode("", &message));
            }
        };

        let mut evaluator = Evaluator::new(&self.interrupt, self.max_call_depth);
        let result = evaluator.eval_program(&program, &self.env);
        let captured = evaluator.into_output().join("\n");

        match result {
            Ok(value) => Ok(protocol::encode(&captured, &value.to_string())),
            Err(err) => Err(protocol::encode(&captured, &err.to_string())),
        }
    }

    fn reset(&mut self) {
        self.env = Env::new();
    }
}
