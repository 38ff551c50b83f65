//! Declarative surface exposed to an orchestrator: the `http-wait` data
//! source (read) and resource (create/read/update/delete).
//!
//! Both wrap a [`Fetcher`](crate::fetch::Fetcher) handed in by the caller and
//! report problems as [`Diagnostics`] instead of errors, so warnings can
//! travel alongside a successful result.

mod data_source;
mod diagnostics;
mod resource;
pub mod schema;

pub use data_source::{HttpDataSource, HttpDataSourceConfig, HttpDataSourceState};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use resource::{HttpResource, HttpResourceConfig, HttpResourceState};

/// Name under which both the data source and the resource are registered.
pub const TYPE_NAME: &str = "http-wait";

/// Outcome of any provider operation: the new state (if any) plus diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Response<S> {
    pub state: Option<S>,
    pub diagnostics: Diagnostics,
}

impl<S> Response<S> {
    pub fn ok(state: S, diagnostics: Diagnostics) -> Self {
        Self {
            state: Some(state),
            diagnostics,
        }
    }

    pub fn failed(diagnostics: Diagnostics) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }
}
