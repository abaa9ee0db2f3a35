//! One-shot outcome of a submitted event.

use crate::engine::error::FsmError;
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot::{self, error::TryRecvError};

type Outcome = Result<(), FsmError>;

/// Receiving side of an event's outcome.
///
/// Exactly one outcome is written per submission. The channel is buffered, so
/// the engine never waits for it to be read, and a completion may simply be
/// dropped.
///
/// A completion can be polled with [`Completion::try_result`], blocked on with
/// [`Completion::wait`], or awaited. Never block on a completion from inside a
/// callback of the same state machine: the entity's processing lock may be
/// held by the very thread that is waiting.
#[derive(Debug)]
#[must_use = "a completion reports whether the event was accepted"]
pub struct Completion {
    rx: oneshot::Receiver<Outcome>,
}

impl Completion {
    /// Block the current thread until the outcome is known.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context;
    /// `.await` the completion there instead.
    pub fn wait(self) -> Outcome {
        self.rx.blocking_recv().unwrap_or(Err(FsmError::Abandoned))
    }

    /// The outcome, if it has been reported yet.
    ///
    /// Once an outcome has been returned, later calls return
    /// `Some(Err(FsmError::Abandoned))`.
    pub fn try_result(&mut self) -> Option<Outcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(FsmError::Abandoned)),
        }
    }
}

impl Future for Completion {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(FsmError::Abandoned)))
    }
}

/// Sending side, shared between the submitter and the dispatch job.
///
/// Whoever reports first wins; later reports are ignored. When every clone is
/// dropped without reporting, the completion resolves to
/// [`FsmError::Abandoned`].
#[derive(Clone)]
pub(crate) struct Reporter {
    slot: Option<Arc<Mutex<Option<oneshot::Sender<Outcome>>>>>,
}

impl Reporter {
    /// A reporter nobody listens to, used for chained events.
    pub(crate) fn detached() -> Self {
        Self { slot: None }
    }

    pub(crate) fn report(&self, outcome: Outcome) {
        let Some(slot) = &self.slot else {
            return;
        };
        if let Some(tx) = slot.lock().take() {
            // The caller may have dropped its completion.
            let _ = tx.send(outcome);
        }
    }
}

pub(crate) fn channel() -> (Reporter, Completion) {
    let (tx, rx) = oneshot::channel();
    let reporter = Reporter {
        slot: Some(Arc::new(Mutex::new(Some(tx)))),
    };
    (reporter, Completion { rx })
}
