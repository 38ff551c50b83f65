//! libcurl transport: one `Easy` handle per attempt.

use super::parse::parse_header_lines;
use super::{FetchRequest, HttpTransport, RawResponse};
use crate::config::TransportConfig;
use crate::error::AttemptError;
use crate::retry::classify_curl_error;
use std::time::Duration;

/// Blocking GET over libcurl. Stateless between attempts, so one instance
/// can be shared by any number of fetches.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    config: TransportConfig,
}

impl CurlTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

/// One raw header line as text; invalid UTF-8 is replaced, not dropped.
fn header_line(data: &[u8]) -> String {
    String::from_utf8_lossy(data).trim_end().to_string()
}

fn curl_err(e: curl::Error) -> AttemptError {
    classify_curl_error(&e)
}

impl HttpTransport for CurlTransport {
    fn get(&self, request: &FetchRequest) -> Result<RawResponse, AttemptError> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url).map_err(curl_err)?;
        easy.get(true).map_err(curl_err)?;
        easy.follow_location(self.config.follow_redirects)
            .map_err(curl_err)?;
        easy.max_redirections(self.config.max_redirects)
            .map_err(curl_err)?;
        easy.connect_timeout(Duration::from_secs(self.config.connect_timeout_secs))
            .map_err(curl_err)?;
        easy.timeout(Duration::from_secs(self.config.request_timeout_secs))
            .map_err(curl_err)?;
        if let Some(ua) = &self.config.user_agent {
            easy.useragent(ua).map_err(curl_err)?;
        }

        if !request.headers.is_empty() {
            // "Name: value" lines; an empty value needs "Name;" for curl to send it.
            let mut list = curl::easy::List::new();
            for (k, v) in &request.headers {
                let line = if v.trim().is_empty() {
                    format!("{};", k.trim())
                } else {
                    format!("{}: {}", k.trim(), v.trim())
                };
                list.append(&line).map_err(curl_err)?;
            }
            easy.http_headers(list).map_err(curl_err)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    header_lines.push(header_line(data));
                    true
                })
                .map_err(curl_err)?;
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_err)?;
            transfer.perform().map_err(curl_err)?;
        }

        let status_code = easy.response_code().map_err(curl_err)?;
        tracing::debug!(
            url = %request.url,
            status = status_code,
            header_lines = header_lines.len(),
            "GET returned"
        );

        Ok(RawResponse {
            status_code,
            headers: parse_header_lines(&header_lines),
            body,
        })
    }
}
