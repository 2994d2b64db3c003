//! # route53-client
//!
//! An async client for the Amazon Route 53 REST/XML API: resource record set
//! changes, record set listing, hosted zone lookup and change status.
//!
//! ## Request Pipeline
//!
//! Every operation goes through one [`Executor`]:
//!
//! 1. the request body is encoded to XML once,
//! 2. the request is signed with `AWS3-HTTPS` using the current credentials,
//! 3. the request is sent through a [`Transport`],
//! 4. HTTP 200 is decoded into the typed result; anything else becomes
//!    [`Route53Error::Remote`] (or [`Route53Error::RemoteUnparsed`]).
//!
//! An HTTP 403 triggers a credential refresh and exactly one retry of the
//! same request. Concurrent callers that hit 403 with the same credentials
//! share a single refresh.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation and Android targets.
//!
//! ## Configuration
//!
//! [`ClientConfig::from_env`] reads:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `ROUTE53_ENDPOINT` | API endpoint, default `https://route53.amazonaws.com` |
//! | `ROUTE53_API_VERSION` | API version path segment, default `2012-12-12` |
//! | `ROUTE53_INCLUDE_WEIGHT` | Send `<Weight>0</Weight>` instead of omitting it |
//! | `ROUTE53_DEBUG` | Dump raw requests/responses at `debug` level |
//! | `ROUTE53_DEADLINE_SECS` | Upper bound for one call, retry included |
//!
//! Credentials for [`Route53Client::from_env`] come from `AWS_ACCESS_KEY_ID`,
//! `AWS_SECRET_ACCESS_KEY` and optionally `AWS_SESSION_TOKEN`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use route53_client::{Change, ResourceRecordSet, Route53Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Route53Client::from_env().await?;
//!
//!     // 1. Find the zone
//!     let zones = client.list_hosted_zones().await?;
//!     let zone = client.hosted_zone(&zones[0].id);
//!
//!     // 2. Create a record
//!     let rrset = ResourceRecordSet::new("www.example.com.", "A", 300, vec!["192.0.2.1".into()]);
//!     let info = zone.change_rrsets(vec![Change::create(rrset)], "add www").await?;
//!     println!("submitted {} ({:?})", info.id, info.status);
//!
//!     // 3. Poll until it is in sync
//!     let status = client.get_change(&info.id).await?;
//!     println!("{:?}", status.status);
//!
//!     // 4. List records
//!     for rrset in zone.list_rrsets().await? {
//!         println!("{} {} {:?}", rrset.name, rrset.record_type, rrset.values);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Route53Error>`](Route53Error):
//!
//! - [`Route53Error::Remote`] — the service answered with an error document
//! - [`Route53Error::Auth`] — credentials could not be obtained or refreshed
//! - [`Route53Error::Transport`] / [`Route53Error::Timeout`] — network failure
//! - [`Route53Error::UnsupportedResult`] — truncated listing (pagination is not supported)
//!
//! Nothing is retried except the single 403 refresh described above.

mod client;
mod config;
mod credentials;
mod error;
mod executor;
mod http_client;
mod request;
mod sign;
mod types;
mod utils;
mod xml;

// Re-export error types
pub use error::{Result, Route53Error};

// Re-export client entry points
pub use client::{HostedZoneHandle, Route53Client, Route53ClientBuilder};
pub use config::{ClientConfig, DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
pub use executor::Executor;

// Re-export credential handling
pub use credentials::{
    CredentialProvider, CredentialSnapshot, CredentialSource, Credentials, EnvCredentialSource,
    INSTANCE_METADATA_ENDPOINT, InstanceMetadataSource, StaticCredentialSource,
};

// Re-export transport seam
pub use http_client::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use request::{Method, Request, RequestBody};
pub use sign::{AUTHORIZATION_HEADER, DATE_HEADER, SECURITY_TOKEN_HEADER};

// Re-export types
pub use types::{
    AliasTarget, Change, ChangeAction, ChangeBatch, ChangeInfo, ChangeStatus, ErrorResponse,
    FailoverRole, HostedZone, ListRrSetsParams, ResourceRecordSet,
};

// Re-export codec entry points
pub use xml::{
    ChangeResponse, CodecOptions, HostedZoneDetail, HostedZoneList, ResponseShape, RrSetList,
    XML_HEADER, encode_body, strip_omitted_elements,
};

pub use utils::log_sanitizer;
