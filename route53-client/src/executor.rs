//! Request executor
//!
//! One `execute` call runs: encode body (once) -> sign -> send -> classify.
//! An HTTP 403 on the first attempt is read as stale credentials: the
//! credential provider is refreshed and the same request is sent exactly once
//! more. Whatever the second attempt yields is the result of the call.

use std::sync::Arc;

use chrono::Utc;

use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::error::{Result, Route53Error};
use crate::http_client::{HttpRequest, HttpResponse, Transport};
use crate::request::{Method, Request};
use crate::sign;
use crate::utils::log_sanitizer::{redact_header, truncate_for_log};
use crate::xml::{self, CodecOptions, ResponseShape};

const STATUS_OK: u16 = 200;
const STATUS_FORBIDDEN: u16 = 403;

pub struct Executor {
    transport: Arc<dyn Transport>,
    credentials: Arc<CredentialProvider>,
    config: ClientConfig,
    codec: CodecOptions,
}

impl Executor {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<CredentialProvider>,
        config: ClientConfig,
    ) -> Self {
        let codec = config.codec_options();
        Self {
            transport,
            credentials,
            config,
            codec,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<CredentialProvider> {
        &self.credentials
    }

    /// Runs `request` and decodes a 200 answer into `R`.
    ///
    /// Bounded by [`ClientConfig::deadline`] when set. Dropping the returned
    /// future cancels the call.
    pub async fn execute<R: ResponseShape>(&self, request: &Request) -> Result<R> {
        let result = match self.config.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.run(request))
                .await
                .unwrap_or_else(|_| {
                    Err(Route53Error::Timeout {
                        detail: format!("deadline of {}ms elapsed", deadline.as_millis()),
                    })
                }),
            None => self.run(request).await,
        };

        if let Err(e) = &result {
            if e.is_expected() {
                log::warn!("[route53] {} {} failed: {e}", request.method(), request.path());
            } else {
                log::error!("[route53] {} {} failed: {e}", request.method(), request.path());
            }
        }
        result
    }

    async fn run<R: ResponseShape>(&self, request: &Request) -> Result<R> {
        let url = request.url(&self.config.endpoint, &self.config.api_version);
        let body = request
            .body()
            .map(|b| xml::encode_body(b, &self.codec))
            .transpose()?;

        let (seen_generation, response) =
            self.attempt(request.method(), &url, body.as_deref()).await?;

        let response = if response.status == STATUS_FORBIDDEN {
            log::warn!(
                "[route53] Forbidden (HTTP 403) on {} {url}, refreshing credentials and retrying once",
                request.method()
            );
            self.credentials.refresh_stale(seen_generation).await?;
            let (_, retried) = self.attempt(request.method(), &url, body.as_deref()).await?;
            retried
        } else {
            response
        };

        classify(response)
    }

    /// Signs with the current credentials and sends. Returns the credential
    /// generation used so a 403 can be tied to it.
    async fn attempt(
        &self,
        method: Method,
        url: &str,
        body: Option<&str>,
    ) -> Result<(u64, HttpResponse)> {
        let snapshot = self.credentials.current().await;
        let date = sign::format_date(Utc::now());

        let mut headers = sign::sign(&snapshot.credentials, &date);
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "text/xml".to_string()));
        }

        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: body.map(str::to_string),
        };

        log::debug!("[route53] {method} {url}");
        if self.config.debug {
            trace_request(&request);
        }

        let response = self.transport.send(request).await?;

        if self.config.debug {
            log::debug!(
                "[route53] -- response HTTP {}\n{}",
                response.status,
                response.body
            );
        }

        Ok((snapshot.generation, response))
    }
}

fn trace_request(request: &HttpRequest) {
    let headers = request
        .headers
        .iter()
        .map(|(k, v)| format!("{k}: {}", redact_header(k, v)))
        .collect::<Vec<_>>()
        .join("\n");
    log::debug!(
        "[route53] -- request {} {}\n{headers}",
        request.method,
        request.url
    );
    if let Some(body) = &request.body {
        log::debug!("[route53] -- body\n{body}");
    }
}

/// 200 -> decode as `R`; anything else -> remote error.
fn classify<R: ResponseShape>(response: HttpResponse) -> Result<R> {
    if response.status == STATUS_OK {
        return R::decode(&response.body);
    }

    match xml::decode_error(&response.body) {
        Ok(error) => Err(error.into_error(response.status)),
        Err(e) => {
            log::debug!(
                "[route53] HTTP {} with undecodable error body ({e}): {}",
                response.status,
                truncate_for_log(&response.body)
            );
            Err(Route53Error::RemoteUnparsed {
                status: response.status,
                body: response.body,
            })
        }
    }
}
