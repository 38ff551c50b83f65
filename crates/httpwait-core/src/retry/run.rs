//! Retry loop: run an attempt until success, permanent failure, budget
//! exhaustion, or shutdown.

use super::attempt::AttemptResult;
use super::error::RetryError;
use crate::backoff::{BackoffConfig, BackoffState, NextInterval};
use crate::shutdown::{wait_for_shutdown, ShutdownRx};
use std::fmt;
use std::future::Future;

/// Runs one logical operation as a serial sequence of attempts.
///
/// Each call to [`RetryExecutor::execute`] owns a fresh [`BackoffState`], so
/// one executor can serve concurrent, independent sequences.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: BackoffConfig,
    shutdown: Option<ShutdownRx>,
}

impl RetryExecutor {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            config,
            shutdown: None,
        }
    }

    /// Abort attempts and waits when `rx` is signalled.
    pub fn with_shutdown(mut self, rx: ShutdownRx) -> Self {
        self.shutdown = Some(rx);
        self
    }

    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }

    /// Calls `operation` until it succeeds or the sequence has to end.
    ///
    /// The elapsed-time budget starts right before the first attempt and is
    /// checked after every retryable failure, before sleeping. Attempt count
    /// is reported but never bounds the loop.
    pub async fn execute<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AttemptResult<T, E>>,
        E: fmt::Display,
    {
        let mut shutdown = self.shutdown.clone();
        let mut state = BackoffState::new(self.config);
        state.reset();

        loop {
            let attempt = state.record_attempt();
            tracing::debug!(attempt, "starting attempt");

            let outcome = tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => {
                    tracing::info!(attempt, "shutdown during attempt; abandoning");
                    return Err(RetryError::Cancelled { attempts: attempt });
                }
                outcome = operation() => outcome,
            };

            let err = match outcome {
                AttemptResult::Success(value) => {
                    if attempt > 1 {
                        tracing::info!(attempt, "attempt succeeded after retries");
                    }
                    return Ok(value);
                }
                AttemptResult::PermanentFailure(e) => {
                    tracing::warn!(attempt, error = %e, "permanent failure; not retrying");
                    return Err(RetryError::Permanent(e));
                }
                AttemptResult::RetryableFailure(e) => e,
            };

            match state.next_interval() {
                NextInterval::Stop => {
                    let elapsed = state.elapsed();
                    tracing::warn!(
                        attempt,
                        elapsed_ms = elapsed.as_millis() as u64,
                        error = %err,
                        "retry budget exhausted"
                    );
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        elapsed,
                        last: err,
                    });
                }
                NextInterval::Wait(delay) => {
                    tracing::info!(
                        attempt,
                        wait_ms = delay.as_millis() as u64,
                        error = %err,
                        "attempt failed; retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = wait_for_shutdown(&mut shutdown) => {
                            tracing::info!(attempt, "shutdown during backoff wait");
                            return Err(RetryError::Cancelled { attempts: attempt });
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }
}
