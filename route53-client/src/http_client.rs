//! HTTP transport
//!
//! The executor talks to the network only through [`Transport`], so the
//! status classification and retry logic can be driven by a scripted
//! transport in tests. [`ReqwestTransport`] is the production implementation.
//!
//! A transport only moves bytes: it never interprets status codes and never
//! retries. The whole response body is read into memory.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::{Result, Route53Error};
use crate::request::Method;
use crate::utils::log_sanitizer::truncate_for_log;

/// A fully signed request ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and complete body of an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and buffers the whole response.
    ///
    /// Fails only on transport problems (`Transport` / `Timeout`); any HTTP
    /// status is a successful send.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client with the connect/request timeouts from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = create_http_client(config.connect_timeout, config.request_timeout)?;
        Ok(Self { client })
    }

    /// Wraps an existing client (shared connection pool, custom TLS, ...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// 创建带超时配置的 HTTP Client
pub(crate) fn create_http_client(connect_timeout: Duration, timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(timeout)
        .build()
        .map_err(|e| Route53Error::Transport {
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        // Send request
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Route53Error::Timeout {
                    detail: e.to_string(),
                }
            } else {
                Route53Error::Transport {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[route53] Response Status: {status}");

        // Read response body
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                Route53Error::Timeout {
                    detail: e.to_string(),
                }
            } else {
                Route53Error::Transport {
                    detail: format!("Failed to read response body: {e}"),
                }
            }
        })?;

        log::trace!("[route53] Response Body: {}", truncate_for_log(&body));

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = HttpRequest {
            method: Method::Get,
            url: "https://route53.amazonaws.com/2012-12-12/hostedzone".into(),
            headers: vec![("X-Amz-Date".into(), "Thu, 14 Mar 2013 09:50:03 GMT".into())],
            body: None,
        };
        assert_eq!(req.header("x-amz-date"), Some("Thu, 14 Mar 2013 09:50:03 GMT"));
        assert_eq!(req.header("Content-Type"), None);
    }

    #[test]
    fn client_builds_with_default_timeouts() {
        let config = ClientConfig::default();
        assert!(ReqwestTransport::new(&config).is_ok());
    }
}
