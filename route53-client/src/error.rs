use serde::Serialize;
use thiserror::Error;

/// Unified error type for every call that goes through the request pipeline.
///
/// No variant carries a partial result. The only recovery the pipeline performs
/// on its own is the single credential refresh after an HTTP 403; everything
/// listed here is terminal for the call that produced it.
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum Route53Error {
    /// Connection, send or body-read failure. Not retried.
    #[error("Transport error: {detail}")]
    Transport {
        /// Error details.
        detail: String,
    },

    /// The transport timed out, or the configured call deadline elapsed.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// Fetching or refreshing credentials failed.
    #[error("Credential refresh failed: {detail}")]
    Auth {
        /// Error details.
        detail: String,
    },

    /// The API answered with a non-200 status and a well-formed error document.
    #[error("{code}: {message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// `Error/Type` (`Sender` or `Receiver`).
        error_type: String,
        /// `Error/Code`, e.g. `InvalidChangeBatch`.
        code: String,
        /// `Error/Message`.
        message: String,
        /// `RequestId` sibling of the error element.
        request_id: String,
    },

    /// The API answered with a non-200 status whose body is not an error document.
    #[error("could not parse: {body}")]
    RemoteUnparsed {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Failed to serialize a request body.
    #[error("Encode error: {detail}")]
    Encode {
        /// Details about the serialization failure.
        detail: String,
    },

    /// Failed to parse a success response body.
    #[error("Decode error: {detail}")]
    Decode {
        /// Details about the parse failure.
        detail: String,
    },

    /// The API returned a truncated (paginated) list. Paging is not followed.
    #[error("Unsupported result: {detail}")]
    UnsupportedResult {
        /// Error details.
        detail: String,
    },

    /// A request was rejected locally before any I/O.
    #[error("Invalid parameter '{param}': {detail}")]
    InvalidParameter {
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },
}

impl Route53Error {
    /// Whether the error came from an HTTP 403 answer.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Remote { status: 403, .. } | Self::RemoteUnparsed { status: 403, .. }
        )
    }

    /// 是否为预期行为（用户输入、远端拒绝等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Remote { .. } | Self::UnsupportedResult { .. } | Self::InvalidParameter { .. }
        )
    }

    pub(crate) fn invalid_parameter(param: &str, detail: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.to_string(),
            detail: detail.into(),
        }
    }
}

/// Convenience type alias for `Result<T, Route53Error>`.
pub type Result<T> = std::result::Result<T, Route53Error>;
