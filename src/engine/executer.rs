//! Executers run dispatch work off the caller's thread.
//!
//! The engine owns no threads. Asynchronous sends hand a [`Job`] to an
//! [`Executer`], which either accepts it (and runs it eventually) or rejects it
//! immediately.

use thiserror::Error;
use tokio::runtime::Handle;

/// A unit of dispatch work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Errors an executer reports when it cannot take a job.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScheduleError {
    #[error("Executer is shut down")]
    Shutdown,

    #[error("Executer is saturated: {0}")]
    Saturated(String),

    #[error("Executer is unavailable: {0}")]
    Unavailable(String),
}

/// Something that can run a job asynchronously.
///
/// Returning `Ok(())` means the job was accepted and will run. A job that is
/// accepted and later dropped without running resolves its completion to
/// [`FsmError::Abandoned`](crate::engine::FsmError::Abandoned).
///
/// Any `Fn(Job) -> Result<(), ScheduleError>` closure is an executer:
///
/// ```rust
/// use lockstep::engine::{Executer, Job, ScheduleError};
///
/// let spawn = |job: Job| -> Result<(), ScheduleError> {
///     std::thread::spawn(job);
///     Ok(())
/// };
/// fn accepts(_: &dyn Executer) {}
/// accepts(&spawn);
/// ```
pub trait Executer: Send + Sync {
    fn execute(&self, job: Job) -> Result<(), ScheduleError>;
}

impl<F> Executer for F
where
    F: Fn(Job) -> Result<(), ScheduleError> + Send + Sync,
{
    fn execute(&self, job: Job) -> Result<(), ScheduleError> {
        self(job)
    }
}

/// Runs jobs on a tokio runtime's blocking pool.
///
/// Dispatch work blocks on entity locks and runs synchronous callbacks, so it
/// goes to `spawn_blocking` rather than onto the async workers.
#[derive(Clone, Debug)]
pub struct TokioExecuter {
    handle: Handle,
}

impl TokioExecuter {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Executer for the runtime the caller is running on.
    pub fn current() -> Result<Self, ScheduleError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|err| ScheduleError::Unavailable(err.to_string()))
    }
}

impl Executer for TokioExecuter {
    fn execute(&self, job: Job) -> Result<(), ScheduleError> {
        // Detached; the completion channel carries the outcome.
        drop(self.handle.spawn_blocking(job));
        Ok(())
    }
}
