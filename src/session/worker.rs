// ABOUTME: Runs a Session on a dedicated worker thread behind an async, cancellable handle.
// ABOUTME: Evaluations are served in order and bounded by a timeout that trips the Interrupt.

use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::engine::{Engine, Interrupt};
use crate::session::Session;

/// Deeply recursive programs need far more than the default 2 MiB.
const WORKER_STACK_SIZE: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The engine raised; carries its encoded `captured|error` payload.
    #[error("evaluation failed: {0}")]
    Evaluation(String),
    #[error("TimeoutError: evaluation exceeded {0:?} and was interrupted")]
    Timeout(Duration),
    #[error("SessionError: the session worker has stopped")]
    Closed,
}

enum Job {
    Evaluate {
        line: String,
        reply: oneshot::Sender<Result<String, String>>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
}

/// Cheap-to-clone handle onto a session living on its own thread.
#[derive(Clone)]
pub struct SessionHandle {
    jobs: mpsc::UnboundedSender<Job>,
    interrupt: Interrupt,
    timeout: Option<Duration>,
}

impl SessionHandle {
    /// Start the worker thread. The engine is built there by `factory`, so it need not be `Send`.
    ///
    /// A zero `timeout` disables the time bound.
    pub fn spawn<F>(factory: F, timeout: Duration) -> anyhow::Result<Self>
    where
        F: FnOnce(Interrupt) -> Box<dyn Engine> + Send + 'static,
    {
        let (jobs, rx) = mpsc::unbounded_channel();
        let interrupt = Interrupt::default();
        let worker_interrupt = interrupt.clone();

        thread::Builder::new()
            .name("monkey-session".to_string())
            .stack_size(WORKER_STACK_SIZE)
            .spawn(move || {
                let session = Session::new(factory(worker_interrupt.clone()));
                run_worker(session, rx, worker_interrupt);
            })?;

        tracing::info!(?timeout, "session worker started");
        Ok(Self {
            jobs,
            interrupt,
            timeout: (!timeout.is_zero()).then_some(timeout),
        })
    }

    /// Evaluate one line, waiting at most the configured timeout.
    pub async fn evaluate(&self, line: String) -> Result<String, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.jobs
            .send(Job::Evaluate { line, reply })
            .map_err(|_| SessionError::Closed)?;

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(?limit, "evaluation timed out, interrupting");
                    self.interrupt.trigger();
                    return Err(SessionError::Timeout(limit));
                }
            },
            None => rx.await,
        };

        match result {
            Ok(Ok(encoded)) => Ok(encoded),
            Ok(Err(encoded)) => Err(SessionError::Evaluation(encoded)),
            Err(_) => Err(SessionError::Closed),
        }
    }

    /// Discard the session's accumulated state.
    pub async fn reset(&self) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.jobs
            .send(Job::Reset { reply })
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }
}

fn run_worker(mut session: Session, mut rx: mpsc::UnboundedReceiver<Job>, interrupt: Interrupt) {
    while let Some(job) = rx.blocking_recv() {
        interrupt.clear();
        match job {
            Job::Evaluate { line, reply } => {
                let started = Instant::now();
                let result = session.evaluate(&line);
                tracing::debug!(
                    evaluation = session.evaluations(),
                    ok = result.is_ok(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "evaluated"
                );
                // The caller may have timed out and gone away.
                let _ = reply.send(result);
            }
            Job::Reset { reply } => {
                session.reset();
                tracing::info!("session reset");
                let _ = reply.send(());
            }
        }
    }
    tracing::debug!("session worker exiting");
}
