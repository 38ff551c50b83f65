//! `httpwait serve` – newline-delimited JSON plugin protocol on stdin/stdout.
//!
//! One request per line: `{"id": "...", "method": "...", "params": {...}}`.
//! One response per line: `{"id": "...", "result": {...}, "diagnostics": [...]}`.
//! Requests are handled in order. EOF or a shutdown signal ends the loop.

use anyhow::{Context, Result};
use httpwait_core::backoff::BackoffSettings;
use httpwait_core::fetch::{Fetcher, HttpTransport};
use httpwait_core::provider::{
    schema, Diagnostics, HttpDataSource, HttpResource, HttpResourceConfig, HttpResourceState,
    Response,
};
use httpwait_core::shutdown::{wait_for_shutdown, ShutdownRx};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

#[derive(Debug, Deserialize)]
pub struct ProtocolRequest {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct ProtocolResponse {
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    pub diagnostics: Diagnostics,
}

impl ProtocolResponse {
    fn error(id: Option<String>, summary: &str, detail: impl Into<String>) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_error(summary, detail);
        Self {
            id,
            result: None,
            diagnostics,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateParams {
    prior: HttpResourceState,
    planned: HttpResourceConfig,
}

/// Data source and resource sharing one fetcher.
pub struct Providers<T> {
    data_source: HttpDataSource<T>,
    resource: HttpResource<T>,
}

impl<T: HttpTransport> Providers<T> {
    pub fn new(fetcher: Fetcher<T>, defaults: &BackoffSettings) -> Self {
        Self {
            data_source: HttpDataSource::new(fetcher.clone(), defaults.clone()),
            resource: HttpResource::new(fetcher, defaults.clone()),
        }
    }

    /// Parse one request line and produce its response line.
    pub async fn handle_line(&self, line: &str) -> ProtocolResponse {
        let request: ProtocolRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("malformed request line: {}", e);
                return ProtocolResponse::error(None, "Malformed request", e.to_string());
            }
        };
        tracing::debug!(id = %request.id, method = %request.method, "request");
        let id = request.id.clone();
        match self.dispatch(request).await {
            Ok((result, diagnostics)) => ProtocolResponse {
                id: Some(id),
                result,
                diagnostics,
            },
            Err(e) => ProtocolResponse::error(Some(id), "Invalid params", format!("{:#}", e)),
        }
    }

    async fn dispatch(&self, request: ProtocolRequest) -> Result<(Option<Value>, Diagnostics)> {
        let params = request.params;
        match request.method.as_str() {
            "read_data_source" => {
                let config = from_params(params)?;
                into_parts(self.data_source.read(&config).await)
            }
            "create_resource" => {
                let config = from_params(params)?;
                into_parts(self.resource.create(&config).await)
            }
            "read_resource" => {
                let prior = from_params(params)?;
                into_parts(self.resource.read(&prior))
            }
            "update_resource" => {
                let UpdateParams { prior, planned } = from_params(params)?;
                into_parts(self.resource.update(&prior, &planned))
            }
            "delete_resource" => {
                let prior = from_params(params)?;
                into_parts(self.resource.delete(&prior))
            }
            "get_schema" => Ok((
                Some(serde_json::to_value(schema::schema())?),
                Diagnostics::new(),
            )),
            other => anyhow::bail!("unknown method {:?}", other),
        }
    }
}

fn from_params<P: DeserializeOwned>(params: Value) -> Result<P> {
    serde_json::from_value(params).context("decoding params")
}

fn into_parts<S: Serialize>(response: Response<S>) -> Result<(Option<Value>, Diagnostics)> {
    let result = response.state.map(serde_json::to_value).transpose()?;
    Ok((result, response.diagnostics))
}

/// Read requests from `reader` until EOF or shutdown, writing one response
/// line per non-empty request line.
pub async fn serve_lines<T, R, W>(
    providers: &Providers<T>,
    reader: R,
    mut writer: W,
    shutdown: Option<ShutdownRx>,
) -> Result<u64>
where
    T: HttpTransport,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut shutdown = shutdown;
    let mut lines = reader.lines();
    let mut handled = 0u64;
    loop {
        let line = tokio::select! {
            biased;
            _ = wait_for_shutdown(&mut shutdown) => {
                tracing::info!("shutdown requested, leaving serve loop");
                break;
            }
            line = lines.next_line() => line.context("reading request")?,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        let response = providers.handle_line(&line).await;
        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        writer.write_all(&out).await.context("writing response")?;
        writer.flush().await?;
        handled += 1;
    }
    Ok(handled)
}

pub async fn run_serve<T: HttpTransport>(
    fetcher: Fetcher<T>,
    defaults: &BackoffSettings,
    shutdown: ShutdownRx,
) -> Result<()> {
    let providers = Providers::new(fetcher, defaults);
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    tracing::info!("serving plugin protocol on stdio");
    let handled = serve_lines(&providers, stdin, stdout, Some(shutdown)).await?;
    tracing::info!(requests = handled, "serve loop finished");
    Ok(())
}
