//! Why a retry sequence ended without a value.

use crate::error::{AttemptError, FetchError};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The operation reported a failure that is never retried.
    #[error("permanent failure: {0}")]
    Permanent(E),
    /// The backoff engine said stop; `last` is the final attempt's failure.
    #[error("retry budget exhausted after {attempts} attempt(s) in {elapsed:?}: {last}")]
    Exhausted {
        attempts: u32,
        elapsed: Duration,
        last: E,
    },
    /// Shutdown was signalled during an attempt or a wait.
    #[error("cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
}

impl<E> RetryError<E> {
    pub fn attempts(&self) -> Option<u32> {
        match self {
            RetryError::Permanent(_) => None,
            RetryError::Exhausted { attempts, .. } | RetryError::Cancelled { attempts } => {
                Some(*attempts)
            }
        }
    }
}

impl From<RetryError<AttemptError>> for FetchError {
    fn from(e: RetryError<AttemptError>) -> Self {
        match e {
            RetryError::Permanent(AttemptError::InvalidRequest(msg)) => {
                FetchError::InvalidRequest(msg)
            }
            RetryError::Permanent(AttemptError::Transport(t)) => {
                FetchError::InvalidRequest(t.to_string())
            }
            RetryError::Permanent(AttemptError::Task(msg)) => FetchError::Task(msg),
            RetryError::Exhausted {
                attempts,
                elapsed,
                last: AttemptError::Transport(last),
            } => FetchError::RetryExhausted {
                attempts,
                elapsed,
                last,
            },
            RetryError::Exhausted {
                last: AttemptError::InvalidRequest(msg),
                ..
            } => FetchError::InvalidRequest(msg),
            RetryError::Exhausted {
                last: AttemptError::Task(msg),
                ..
            } => FetchError::Task(msg),
            RetryError::Cancelled { attempts } => FetchError::Cancelled { attempts },
        }
    }
}
