//! Retrying executor.
//!
//! Drives a caller-supplied attempt operation against the backoff engine's
//! schedule, stopping on success, on a permanent failure, when the engine
//! says stop, or when the shutdown signal fires.

mod attempt;
mod classify;
mod error;
mod run;

pub use attempt::AttemptResult;
pub use classify::classify_curl_error;
pub use error::RetryError;
pub use run::RetryExecutor;
