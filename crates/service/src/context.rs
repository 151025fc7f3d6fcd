//! Per-call cancellation and deadline.
//!
//! Every orchestrator operation receives a `CallContext` and hands the same
//! context to each repository call it makes. Once the context is cancelled
//! (client gone, process shutting down) or its deadline passes, no further
//! repository call is started and an in-flight one is abandoned.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::ServiceError;

#[derive(Clone, Debug, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that is never cancelled unless [`CallContext::cancel`] is called.
    pub fn new() -> Self { Self::default() }

    /// Bind to an existing token, e.g. the process-wide shutdown token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self { token, deadline: None }
    }

    /// Derive a context that is cancelled with `self` but can also be
    /// cancelled on its own.
    pub fn child(&self) -> Self {
        Self { token: self.token.child_token(), deadline: self.deadline }
    }

    /// Bound the context by `timeout` from now. An earlier existing deadline
    /// is kept.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        });
        self
    }

    pub fn cancel(&self) { self.token.cancel() }

    pub fn token(&self) -> &CancellationToken { &self.token }

    pub fn deadline(&self) -> Option<Instant> { self.deadline }

    /// Time left before the deadline, `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_cancelled(&self) -> bool {
        self.check().is_err()
    }

    pub fn check(&self) -> Result<(), ServiceError> {
        if self.token.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(ServiceError::DeadlineExceeded);
            }
        }
        Ok(())
    }

    /// Drive a repository future under this context.
    ///
    /// The future is not polled at all if the context is already done, so a
    /// lazily-started repository call never reaches storage.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        self.check()?;
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(ServiceError::Cancelled),
                _ = tokio::time::sleep_until(deadline) => Err(ServiceError::DeadlineExceeded),
                res = fut => res,
            },
            None => tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(ServiceError::Cancelled),
                res = fut => res,
            },
        }
    }
}
