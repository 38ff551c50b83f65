//! `httpwait create <url>` – block until the URL answers, then print its id.

use anyhow::{Context, Result};
use httpwait_core::backoff::BackoffSettings;
use httpwait_core::fetch::{Fetcher, HttpTransport};
use httpwait_core::provider::{HttpResource, HttpResourceConfig};

use super::report;
use crate::cli::FetchArgs;

pub async fn run_create<T: HttpTransport>(
    fetcher: Fetcher<T>,
    defaults: &BackoffSettings,
    args: &FetchArgs,
) -> Result<()> {
    let config = HttpResourceConfig {
        url: args.url.clone(),
        request_headers: args.request_headers(),
        backoff: args.backoff(),
    };
    let response = HttpResource::new(fetcher, defaults.clone())
        .create(&config)
        .await;
    report(&response.diagnostics)?;
    let state = response.state.context("create returned no state")?;
    println!("{}", state.id);
    Ok(())
}
