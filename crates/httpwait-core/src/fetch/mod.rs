//! HTTP GET with retries.
//!
//! A [`Fetcher`] pairs an injected [`HttpTransport`] (normally
//! [`CurlTransport`]) with the retry executor. Every attempt runs the
//! blocking transport on tokio's blocking pool; transport errors are retried
//! according to the backoff config, and any HTTP status, 4xx and 5xx
//! included, counts as a completed fetch.

mod easy;
mod parse;

pub use easy::CurlTransport;
pub use parse::{canonical_header_name, join_headers};

use crate::backoff::{BackoffConfig, BackoffSettings};
use crate::content_type::{classify_content_type, ContentClass};
use crate::error::{AttemptError, FetchError};
use crate::retry::{AttemptResult, RetryExecutor};
use crate::shutdown::ShutdownRx;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One logical GET: the URL and the request headers to send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Check the request can be issued at all: an absolute http(s) URL with a
    /// host, and header names/values that fit on a header line.
    pub fn validate(&self) -> Result<(), FetchError> {
        let url = url::Url::parse(&self.url)
            .map_err(|e| FetchError::InvalidRequest(format!("invalid URL {:?}: {}", self.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidRequest(format!(
                "unsupported URL scheme {:?}; expected http or https",
                url.scheme()
            )));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(FetchError::InvalidRequest(format!(
                "URL {:?} has no host",
                self.url
            )));
        }
        for (name, value) in &self.headers {
            let name_ok = !name.is_empty()
                && name
                    .bytes()
                    .all(|b| b.is_ascii_graphic() && b != b':');
            if !name_ok {
                return Err(FetchError::InvalidRequest(format!(
                    "invalid header name {:?}",
                    name
                )));
            }
            if value.contains(['\r', '\n', '\0']) {
                return Err(FetchError::InvalidRequest(format!(
                    "invalid value for header {:?}",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// What a transport hands back for one completed exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status_code: u32,
    /// Header pairs in arrival order; names may repeat.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// A completed fetch, whatever the status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub status_code: u32,
    /// Canonical header name to value; repeated headers joined with `", "`.
    pub headers: BTreeMap<String, String>,
    /// Body decoded as UTF-8, invalid sequences replaced.
    pub body: String,
}

impl FetchResponse {
    pub fn from_raw(raw: RawResponse) -> Self {
        Self {
            status_code: raw.status_code,
            headers: join_headers(&raw.headers),
            body: String::from_utf8_lossy(&raw.body).into_owned(),
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type").map(String::as_str)
    }

    pub fn content_class(&self) -> ContentClass {
        classify_content_type(self.content_type())
    }
}

/// Performs one network attempt. Implementations block; the fetcher calls
/// them from `spawn_blocking`.
pub trait HttpTransport: Send + Sync + 'static {
    /// Issue a GET. Return `AttemptError::Transport` for failures worth
    /// retrying and `AttemptError::InvalidRequest` for ones that are not.
    fn get(&self, request: &FetchRequest) -> Result<RawResponse, AttemptError>;
}

/// Runs fetches over a shared transport handle.
pub struct Fetcher<T> {
    transport: Arc<T>,
    shutdown: Option<ShutdownRx>,
}

impl<T> Clone for Fetcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<T: HttpTransport> Fetcher<T> {
    pub fn new(transport: T) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    pub fn from_arc(transport: Arc<T>) -> Self {
        Self {
            transport,
            shutdown: None,
        }
    }

    /// Cancel in-flight fetches when `rx` is signalled.
    pub fn with_shutdown(mut self, rx: ShutdownRx) -> Self {
        self.shutdown = Some(rx);
        self
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Resolve declarative backoff settings, then fetch. Malformed settings
    /// fail here, before any network attempt.
    pub async fn fetch_with_settings(
        &self,
        request: &FetchRequest,
        settings: &BackoffSettings,
    ) -> Result<FetchResponse, FetchError> {
        let config = settings.resolve()?;
        self.fetch(request, &config).await
    }

    /// GET `request.url`, retrying transport failures per `config`.
    pub async fn fetch(
        &self,
        request: &FetchRequest,
        config: &BackoffConfig,
    ) -> Result<FetchResponse, FetchError> {
        request.validate()?;
        tracing::info!(
            url = %request.url,
            initial_interval_ms = config.initial_interval().as_millis() as u64,
            max_interval_ms = config.max_interval().as_millis() as u64,
            max_elapsed_time_s = config.max_elapsed_time().as_secs_f64(),
            multiplier = config.multiplier(),
            randomization_factor = config.randomization_factor(),
            "fetching with backoff"
        );

        let mut executor = RetryExecutor::new(*config);
        if let Some(rx) = &self.shutdown {
            executor = executor.with_shutdown(rx.clone());
        }

        let raw = executor
            .execute(|| {
                let transport = Arc::clone(&self.transport);
                let request = request.clone();
                async move {
                    match tokio::task::spawn_blocking(move || transport.get(&request)).await {
                        Ok(res) => AttemptResult::from(res),
                        Err(e) => AttemptResult::PermanentFailure(AttemptError::Task(e.to_string())),
                    }
                }
            })
            .await?;

        let response = FetchResponse::from_raw(raw);
        tracing::info!(
            url = %request.url,
            status = response.status_code,
            body_len = response.body.len(),
            "fetch complete"
        );
        Ok(response)
    }
}
