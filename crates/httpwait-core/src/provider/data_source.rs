//! `http-wait` data source: GET a URL and export the response.

use super::diagnostics::Diagnostics;
use super::Response;
use crate::backoff::BackoffSettings;
use crate::content_type::{not_text_summary, ContentClass, NOT_TEXT_DETAIL};
use crate::fetch::{FetchRequest, Fetcher, HttpTransport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User-supplied arguments of the data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpDataSourceConfig {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub backoff: BackoffSettings,
}

impl HttpDataSourceConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub(crate) fn to_request(&self) -> FetchRequest {
        FetchRequest {
            url: self.url.clone(),
            headers: self.request_headers.clone().unwrap_or_default(),
        }
    }
}

/// Arguments plus the exported response attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpDataSourceState {
    #[serde(flatten)]
    pub config: HttpDataSourceConfig,
    /// Always the request URL.
    pub id: String,
    pub response_body: String,
    pub response_headers: BTreeMap<String, String>,
    pub status_code: u32,
}

pub struct HttpDataSource<T> {
    fetcher: Fetcher<T>,
    defaults: BackoffSettings,
}

impl<T: HttpTransport> HttpDataSource<T> {
    /// `defaults` fill in any backoff field the config leaves unset.
    pub fn new(fetcher: Fetcher<T>, defaults: BackoffSettings) -> Self {
        Self { fetcher, defaults }
    }

    pub async fn read(&self, config: &HttpDataSourceConfig) -> Response<HttpDataSourceState> {
        let mut diags = Diagnostics::new();
        let settings = self.defaults.merged_with(&config.backoff);

        let response = match self
            .fetcher
            .fetch_with_settings(&config.to_request(), &settings)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url = %config.url, "data source read failed: {}", e);
                diags.add_fetch_error(&e);
                return Response::failed(diags);
            }
        };

        if response.content_class() == ContentClass::NotText {
            diags.add_warning(not_text_summary(response.content_type()), NOT_TEXT_DETAIL);
        }

        let state = HttpDataSourceState {
            config: config.clone(),
            id: config.url.clone(),
            response_body: response.body,
            response_headers: response.headers,
            status_code: response.status_code,
        };
        Response::ok(state, diags)
    }
}
