//! Bounded polling
//!
//! Synchronizes the caller with a state transition that happens on the remote
//! side (an instance booting, a test running to completion). The caller hands
//! over a query that performs exactly one status request and a predicate over
//! its result; the poller re-runs the query at a fixed interval until the
//! predicate holds or the attempt budget derived from the timeout runs out.
//!
//! Errors returned by the query are never retried: they abort the wait and are
//! handed back unchanged inside [`WaitError::Query`].

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

/// Shortest interval a poller will sleep between attempts
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// The wait ran out of attempts before the condition was met
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("timed out waiting for {what} after {elapsed:?} ({attempts} attempts)")]
    Timeout {
        /// What was being waited for
        what: String,
        /// Wall-clock time spent waiting
        elapsed: Duration,
        /// Number of queries issued
        attempts: u32,
    },
}

impl PollError {
    /// Wall-clock time spent before giving up
    pub fn elapsed(&self) -> Duration {
        match self {
            PollError::Timeout { elapsed, .. } => *elapsed,
        }
    }
}

/// Outcome of a failed wait
#[derive(Debug, Error)]
pub enum WaitError<E> {
    /// The condition was not met in time
    #[error(transparent)]
    TimedOut(#[from] PollError),

    /// The query itself failed; the wait was aborted on the spot
    #[error(transparent)]
    Query(E),
}

impl<E> WaitError<E> {
    /// Returns the timeout, if this wait timed out
    pub fn as_timeout(&self) -> Option<&PollError> {
        match self {
            WaitError::TimedOut(err) => Some(err),
            WaitError::Query(_) => None,
        }
    }

    /// Returns the query error, if the query failed
    pub fn into_query_error(self) -> Option<E> {
        match self {
            WaitError::Query(err) => Some(err),
            WaitError::TimedOut(_) => None,
        }
    }
}

/// Fixed-interval poller with an attempt budget
///
/// The budget is `timeout / interval` attempts (at least one). The poller
/// sleeps after every unsuccessful attempt, including the last one, so a wait
/// that never succeeds returns after roughly `timeout`. Exact boundary timing
/// is approximate: nothing finer than one interval should be relied upon.
#[derive(Debug, Clone)]
pub struct Poller {
    what: String,
    interval: Duration,
    timeout: Duration,
}

impl Poller {
    /// Creates a poller checking every `interval` for at most `timeout`
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            what: "condition".to_string(),
            interval: interval.max(MIN_INTERVAL),
            timeout,
        }
    }

    /// Names what is being waited for, used in logs and the timeout error
    pub fn describe(mut self, what: impl Into<String>) -> Self {
        self.what = what.into();
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Maximum number of queries a single wait will issue
    pub fn max_attempts(&self) -> u32 {
        let attempts = self.timeout.as_nanos() / self.interval.as_nanos();
        attempts.clamp(1, u32::MAX as u128) as u32
    }

    /// Blocks the current thread until `done` accepts a snapshot from `query`
    ///
    /// Returns the first snapshot that satisfied the predicate. No query is
    /// issued after that.
    pub fn wait<T, E, Q, P>(&self, mut query: Q, mut done: P) -> Result<T, WaitError<E>>
    where
        Q: FnMut() -> Result<T, E>,
        P: FnMut(&T) -> bool,
    {
        let started = std::time::Instant::now();
        let max_attempts = self.max_attempts();

        for attempt in 1..=max_attempts {
            let snapshot = query().map_err(WaitError::Query)?;
            if done(&snapshot) {
                self.log_reached(attempt, started.elapsed());
                return Ok(snapshot);
            }
            self.log_pending(attempt, max_attempts);
            std::thread::sleep(self.interval);
        }

        Err(self.timed_out(started.elapsed(), max_attempts).into())
    }

    /// Async twin of [`Poller::wait`]
    ///
    /// Suspends the calling task on the runtime timer between attempts. The
    /// waiting flow is still strictly sequential: one query in flight at a time.
    pub async fn wait_async<T, E, Q, F, P>(
        &self,
        mut query: Q,
        mut done: P,
    ) -> Result<T, WaitError<E>>
    where
        Q: FnMut() -> F,
        F: Future<Output = Result<T, E>>,
        P: FnMut(&T) -> bool,
    {
        let started = tokio::time::Instant::now();
        let max_attempts = self.max_attempts();

        for attempt in 1..=max_attempts {
            let snapshot = query().await.map_err(WaitError::Query)?;
            if done(&snapshot) {
                self.log_reached(attempt, started.elapsed());
                return Ok(snapshot);
            }
            self.log_pending(attempt, max_attempts);
            tokio::time::sleep(self.interval).await;
        }

        Err(self.timed_out(started.elapsed(), max_attempts).into())
    }

    fn log_reached(&self, attempt: u32, elapsed: Duration) {
        info!(
            "{} reached after {} attempt(s) in {:?}",
            self.what, attempt, elapsed
        );
    }

    fn log_pending(&self, attempt: u32, max_attempts: u32) {
        debug!(
            "{} not reached yet (attempt {}/{}), retrying in {:?}",
            self.what, attempt, max_attempts, self.interval
        );
    }

    fn timed_out(&self, elapsed: Duration, attempts: u32) -> PollError {
        warn!(
            "Gave up waiting for {} after {:?} ({} attempts)",
            self.what, elapsed, attempts
        );
        PollError::Timeout {
            what: self.what.clone(),
            elapsed,
            attempts,
        }
    }
}
