//! Client configuration.

use std::time::Duration;

use crate::error::{Result, Route53Error};
use crate::xml::CodecOptions;

/// Default API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://route53.amazonaws.com";
/// API version the wire types are written against.
pub const DEFAULT_API_VERSION: &str = "2012-12-12";

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings consumed by the request pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme and host, without the version prefix.
    pub endpoint: String,
    pub api_version: String,
    /// Send `<Weight>0</Weight>` instead of treating zero as unset.
    pub include_weight: bool,
    /// Dump raw requests and responses through `log::debug!`.
    pub debug: bool,
    pub connect_timeout: Duration,
    /// Per-attempt transport timeout.
    pub request_timeout: Duration,
    /// Upper bound for a whole `execute` call, retry included.
    pub deadline: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            include_weight: false,
            debug: false,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            deadline: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `ROUTE53_*` environment variables.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `ROUTE53_ENDPOINT` | `endpoint` |
    /// | `ROUTE53_API_VERSION` | `api_version` |
    /// | `ROUTE53_INCLUDE_WEIGHT` | `include_weight` |
    /// | `ROUTE53_DEBUG` | `debug` |
    /// | `ROUTE53_DEADLINE_SECS` | `deadline` |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("ROUTE53_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(version) = lookup("ROUTE53_API_VERSION") {
            config.api_version = version;
        }
        if let Some(value) = lookup("ROUTE53_INCLUDE_WEIGHT") {
            config.include_weight = parse_flag("ROUTE53_INCLUDE_WEIGHT", &value)?;
        }
        if let Some(value) = lookup("ROUTE53_DEBUG") {
            config.debug = parse_flag("ROUTE53_DEBUG", &value)?;
        }
        if let Some(value) = lookup("ROUTE53_DEADLINE_SECS") {
            let secs = value.trim().parse::<u64>().map_err(|e| {
                Route53Error::invalid_parameter("ROUTE53_DEADLINE_SECS", e.to_string())
            })?;
            config.deadline = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    #[must_use]
    pub fn include_weight(mut self, include_weight: bool) -> Self {
        self.include_weight = include_weight;
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(Route53Error::invalid_parameter(
                "endpoint",
                format!("'{}' is not an http(s) URL", self.endpoint),
            ));
        }
        if self.api_version.is_empty() || self.api_version.contains('/') {
            return Err(Route53Error::invalid_parameter(
                "api_version",
                format!("'{}' is not a version string", self.api_version),
            ));
        }
        Ok(())
    }

    pub(crate) fn codec_options(&self) -> CodecOptions {
        CodecOptions::for_api_version(&self.api_version, self.include_weight)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Route53Error::invalid_parameter(
            key,
            format!("'{other}' is not a boolean"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, "https://route53.amazonaws.com");
        assert_eq!(config.api_version, "2012-12-12");
        assert!(!config.include_weight);
        assert!(!config.debug);
        assert_eq!(config.deadline, None);
        assert_eq!(
            config.codec_options().xmlns,
            "https://route53.amazonaws.com/doc/2012-12-12/"
        );
    }

    #[test]
    fn empty_environment_keeps_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn environment_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("ROUTE53_ENDPOINT", "http://127.0.0.1:9000"),
            ("ROUTE53_API_VERSION", "2013-04-01"),
            ("ROUTE53_INCLUDE_WEIGHT", "yes"),
            ("ROUTE53_DEBUG", "1"),
            ("ROUTE53_DEADLINE_SECS", "15"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:9000");
        assert_eq!(config.api_version, "2013-04-01");
        assert!(config.include_weight);
        assert!(config.debug);
        assert_eq!(config.deadline, Some(Duration::from_secs(15)));
    }

    #[test]
    fn invalid_flag_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("ROUTE53_DEBUG", "maybe")])).unwrap_err();
        assert!(
            matches!(&err, Route53Error::InvalidParameter { param, .. } if param == "ROUTE53_DEBUG"),
            "{err:?}"
        );
    }

    #[test]
    fn invalid_deadline_rejected() {
        assert!(ClientConfig::from_lookup(lookup(&[("ROUTE53_DEADLINE_SECS", "soon")])).is_err());
    }

    #[test]
    fn invalid_endpoint_rejected() {
        assert!(ClientConfig::default().endpoint("route53.amazonaws.com").validate().is_err());
    }
}
