pub mod config;
pub mod logging;

pub mod backoff;
pub mod content_type;
pub mod error;
pub mod fetch;
pub mod provider;
pub mod retry;
pub mod shutdown;

#[cfg(test)]
mod testing;

pub use backoff::{BackoffConfig, BackoffSettings};
pub use error::{ConfigError, FetchError, TransportError};
pub use fetch::{CurlTransport, FetchRequest, FetchResponse, Fetcher, HttpTransport};
