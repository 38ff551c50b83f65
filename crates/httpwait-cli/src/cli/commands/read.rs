//! `httpwait read <url>` – fetch and print the data source state.

use anyhow::{Context, Result};
use httpwait_core::backoff::BackoffSettings;
use httpwait_core::fetch::{Fetcher, HttpTransport};
use httpwait_core::provider::{HttpDataSource, HttpDataSourceConfig};

use super::report;
use crate::cli::FetchArgs;

pub async fn run_read<T: HttpTransport>(
    fetcher: Fetcher<T>,
    defaults: &BackoffSettings,
    args: &FetchArgs,
) -> Result<()> {
    let config = HttpDataSourceConfig {
        url: args.url.clone(),
        request_headers: args.request_headers(),
        backoff: args.backoff(),
    };
    let response = HttpDataSource::new(fetcher, defaults.clone())
        .read(&config)
        .await;
    report(&response.diagnostics)?;
    let state = response.state.context("read returned no state")?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
