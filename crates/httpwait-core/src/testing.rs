//! In-memory transport for unit tests.

use crate::error::{AttemptError, TransportError};
use crate::fetch::{FetchRequest, HttpTransport, RawResponse};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Replays a scripted list of outcomes; the last one repeats forever.
pub(crate) struct ScriptedTransport {
    script: Mutex<Vec<Result<RawResponse, AttemptError>>>,
    calls: AtomicU32,
    last_request: Mutex<Option<FetchRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Result<RawResponse, AttemptError>>) -> Self {
        assert!(!script.is_empty(), "script needs at least one outcome");
        Self {
            script: Mutex::new(script),
            calls: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<FetchRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn get(&self, request: &FetchRequest) -> Result<RawResponse, AttemptError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.remove(0)
        } else {
            script[0].clone()
        }
    }
}

pub(crate) fn response(
    status: u32,
    headers: &[(&str, &str)],
    body: &str,
) -> Result<RawResponse, AttemptError> {
    Ok(RawResponse {
        status_code: status,
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        body: body.as_bytes().to_vec(),
    })
}

pub(crate) fn text(status: u32, body: &str) -> Result<RawResponse, AttemptError> {
    response(status, &[("Content-Type", "text/plain")], body)
}

pub(crate) fn refused() -> Result<RawResponse, AttemptError> {
    Err(AttemptError::Transport(TransportError::Connect(
        "connection refused".into(),
    )))
}
