//! HTTP transport.
//!
//! Uses the curl crate (libcurl) for GET requests. Transfers are blocking;
//! async callers run them through `tokio::task::spawn_blocking`.

mod headers;

pub use headers::ResponseHeaders;

use std::str;
use std::time::Duration;

use crate::config::ArchiverConfig;
use crate::error::FetchError;

/// A completed response: status, headers of the final hop, and full body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches a URL. Implementations are shared across download tasks.
pub trait HttpFetcher: Send + Sync {
    /// GET `url`. Non-2xx statuses are reported as `FetchError::Http`.
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// Curl-backed fetcher. One `Easy` handle per request.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: String,
}

impl CurlFetcher {
    pub fn new(connect_timeout: Duration, timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            connect_timeout,
            timeout,
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(cfg: &ArchiverConfig) -> Self {
        Self::new(
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.timeout_secs),
            cfg.user_agent.clone(),
        )
    }

    /// GET with extra request headers. Returns the response whatever its
    /// status; callers decide how to treat non-2xx.
    pub fn get_raw(&self, url: &str, request_headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.useragent(&self.user_agent)?;

        if !request_headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (k, v) in request_headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))?;
            }
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                header_lines.push(decode_header_line(data).trim_end().to_string());
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(HttpResponse {
            status,
            headers: ResponseHeaders::from_lines(&header_lines),
            body,
        })
    }
}

/// Header bytes as text. Lines that are not UTF-8 are read as ISO-8859-1,
/// one char per byte, so no header is ever lost.
fn decode_header_line(data: &[u8]) -> String {
    match str::from_utf8(data) {
        Ok(s) => s.to_string(),
        Err(_) => data.iter().map(|&b| char::from(b)).collect(),
    }
}

impl HttpFetcher for CurlFetcher {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self.get_raw(url, &[])?;
        if !response.is_success() {
            return Err(FetchError::Http(response.status));
        }
        tracing::debug!(url, bytes = response.body.len(), "GET complete");
        Ok(response)
    }
}
