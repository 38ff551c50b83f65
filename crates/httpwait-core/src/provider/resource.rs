//! `http-wait` resource: "wait until this URL answers" as a managed object.
//!
//! Only `create` touches the network. The response is not kept; a resource
//! exists once its URL has answered.

use super::diagnostics::Diagnostics;
use super::Response;
use crate::backoff::BackoffSettings;
use crate::fetch::{FetchRequest, Fetcher, HttpTransport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResourceConfig {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub backoff: BackoffSettings,
}

impl HttpResourceConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    fn to_request(&self) -> FetchRequest {
        FetchRequest {
            url: self.url.clone(),
            headers: self.request_headers.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResourceState {
    #[serde(flatten)]
    pub config: HttpResourceConfig,
    pub id: String,
}

pub struct HttpResource<T> {
    fetcher: Fetcher<T>,
    defaults: BackoffSettings,
}

impl<T: HttpTransport> HttpResource<T> {
    pub fn new(fetcher: Fetcher<T>, defaults: BackoffSettings) -> Self {
        Self { fetcher, defaults }
    }

    /// Fetch once (with retries); on any completed response the resource
    /// exists with `id = url`.
    pub async fn create(&self, config: &HttpResourceConfig) -> Response<HttpResourceState> {
        let mut diags = Diagnostics::new();
        let settings = self.defaults.merged_with(&config.backoff);

        match self
            .fetcher
            .fetch_with_settings(&config.to_request(), &settings)
            .await
        {
            Ok(resp) => {
                tracing::debug!(url = %config.url, status = resp.status_code, "resource created");
                Response::ok(
                    HttpResourceState {
                        config: config.clone(),
                        id: config.url.clone(),
                    },
                    diags,
                )
            }
            Err(e) => {
                tracing::warn!(url = %config.url, "resource create failed: {}", e);
                diags.add_fetch_error(&e);
                Response::failed(diags)
            }
        }
    }

    pub fn read(&self, prior: &HttpResourceState) -> Response<HttpResourceState> {
        Response::ok(prior.clone(), Diagnostics::new())
    }

    /// The URL is the identity; changing it needs a new resource.
    pub fn update(
        &self,
        prior: &HttpResourceState,
        planned: &HttpResourceConfig,
    ) -> Response<HttpResourceState> {
        let mut diags = Diagnostics::new();
        if planned.url != prior.config.url {
            diags.add_error(
                "Cannot update url in place",
                format!(
                    "changing url from {:?} to {:?} requires replacement",
                    prior.config.url, planned.url
                ),
            );
            return Response::failed(diags);
        }
        Response::ok(
            HttpResourceState {
                config: planned.clone(),
                id: prior.id.clone(),
            },
            diags,
        )
    }

    pub fn delete(&self, prior: &HttpResourceState) -> Response<HttpResourceState> {
        tracing::debug!(id = %prior.id, "resource deleted");
        Response::failed(Diagnostics::new())
    }
}
