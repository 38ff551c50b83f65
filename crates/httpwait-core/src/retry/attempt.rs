//! Outcome of a single attempt, as reported by the operation itself.

use crate::error::AttemptError;

/// Tells the executor whether to return, give up, or consult the backoff engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult<T, E> {
    Success(T),
    /// Transient failure; retry if the budget allows.
    RetryableFailure(E),
    /// Retrying cannot help (e.g. the request itself is malformed).
    PermanentFailure(E),
}

impl<T, E> AttemptResult<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptResult::Success(_))
    }
}

impl<T> From<Result<T, AttemptError>> for AttemptResult<T, AttemptError> {
    fn from(res: Result<T, AttemptError>) -> Self {
        match res {
            Ok(v) => AttemptResult::Success(v),
            Err(e @ AttemptError::Transport(_)) => AttemptResult::RetryableFailure(e),
            Err(e @ (AttemptError::InvalidRequest(_) | AttemptError::Task(_))) => {
                AttemptResult::PermanentFailure(e)
            }
        }
    }
}
