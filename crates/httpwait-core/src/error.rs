//! Error types shared by the backoff engine, the transport, and the fetcher.

use std::time::Duration;
use thiserror::Error;

/// A backoff tuning parameter that could not be turned into a valid `BackoffConfig`.
///
/// Always reported before the first network attempt; never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A decimal string field did not parse as a float.
    #[error("error converting {field} value {value:?} to float64: {reason}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        reason: String,
    },
    /// An integer field was negative.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },
    /// An interval that must be positive was zero.
    #[error("{field} must be greater than zero")]
    NonPositiveInterval { field: &'static str },
    #[error("multiplier must be a finite number >= 1, got {0}")]
    Multiplier(f64),
    #[error("randomization_factor must be in [0, 1), got {0}")]
    RandomizationFactor(f64),
}

/// Transport-level failure of a single attempt. Every variant is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// DNS resolution failed.
    #[error("no such host: {0}")]
    Resolve(String),
    /// TCP connect failed (refused, unreachable).
    #[error("connection failed: {0}")]
    Connect(String),
    /// TLS handshake or certificate verification failed.
    #[error("tls error: {0}")]
    Tls(String),
    #[error("timed out: {0}")]
    Timeout(String),
    /// Send/receive failure after the connection was established.
    #[error("i/o error: {0}")]
    Io(String),
    #[error("{0}")]
    Other(String),
}

/// Failure of one attempt, before retry classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The request could not be issued as given; retrying cannot help.
    #[error("{0}")]
    InvalidRequest(String),
    /// The blocking attempt task panicked or was cancelled by the runtime.
    #[error("attempt task failed: {0}")]
    Task(String),
}

/// Failure of a whole logical fetch (all attempts).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The request could not be built or sent at all (bad URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The elapsed-time budget ran out before any attempt succeeded.
    #[error("giving up after {attempts} attempt(s) in {elapsed:?}: {last}")]
    RetryExhausted {
        attempts: u32,
        elapsed: Duration,
        #[source]
        last: TransportError,
    },
    #[error("fetch cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
    /// The blocking attempt task panicked or was cancelled by the runtime.
    #[error("attempt task failed: {0}")]
    Task(String),
}

impl FetchError {
    /// Short diagnostic summary, used as the headline of provider errors.
    pub fn summary(&self) -> &'static str {
        match self {
            FetchError::Config(_) => "Invalid backoff configuration",
            FetchError::InvalidRequest(_) => "Error creating request",
            FetchError::RetryExhausted { .. } => "Error making request",
            FetchError::Cancelled { .. } => "Request cancelled",
            FetchError::Task(_) => "Error making request",
        }
    }

    /// The last transport error, if this fetch gave up after retrying.
    pub fn last_transport_error(&self) -> Option<&TransportError> {
        match self {
            FetchError::RetryExhausted { last, .. } => Some(last),
            _ => None,
        }
    }
}
