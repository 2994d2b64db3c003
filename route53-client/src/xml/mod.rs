//! XML codec for the Route 53 dialect
//!
//! Encoding goes domain type -> wire struct -> `quick_xml` serializer. The two
//! elements whose bare presence changes remote semantics are handled while
//! building the wire struct:
//!
//! - `AliasTarget` is never written empty (an empty element marks an alias record).
//! - `<Weight>0</Weight>` is only written when [`CodecOptions::include_weight`] is set.
//!
//! [`strip_omitted_elements`] is the equivalent string-level pass. It runs over
//! the serialized document as a final step, which is a no-op for documents
//! produced here and keeps the output identical to a serialize-then-strip codec.

mod wire;

use serde::de::DeserializeOwned;

use crate::error::{Result, Route53Error};
use crate::request::RequestBody;
use crate::types::{ChangeBatch, ChangeInfo, ErrorResponse, HostedZone, ResourceRecordSet};
use crate::utils::log_sanitizer::truncate_for_log;

use wire::{
    WireChangeRequest, WireChangeResponse, WireErrorResponse, WireGetHostedZoneResponse,
    WireListHostedZonesResponse, WireListRrSetsResponse,
};

pub(crate) use wire::strip_prefix;

/// Declaration prepended to every request document.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Serialization switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Keep `<Weight>0</Weight>` instead of treating zero as unset.
    pub include_weight: bool,
    /// Namespace attribute of the request root.
    pub xmlns: String,
}

impl CodecOptions {
    pub fn for_api_version(api_version: &str, include_weight: bool) -> Self {
        Self {
            include_weight,
            xmlns: format!("https://route53.amazonaws.com/doc/{api_version}/"),
        }
    }
}

/// Encodes a request body as a complete XML document (declaration included).
pub fn encode_body(body: &RequestBody, options: &CodecOptions) -> Result<String> {
    match body {
        RequestBody::ChangeBatch(batch) => encode_change_batch(batch, options),
    }
}

fn encode_change_batch(batch: &ChangeBatch, options: &CodecOptions) -> Result<String> {
    let wire = WireChangeRequest::from_domain(batch, options);
    let xml = quick_xml::se::to_string(&wire).map_err(|e| Route53Error::Encode {
        detail: e.to_string(),
    })?;
    Ok(format!(
        "{XML_HEADER}{}",
        strip_omitted_elements(&xml, options.include_weight)
    ))
}

/// Removes every empty `AliasTarget` element and, unless `include_weight`,
/// every literal `<Weight>0</Weight>`.
pub fn strip_omitted_elements(xml: &str, include_weight: bool) -> String {
    let stripped = xml
        .replace("<AliasTarget></AliasTarget>", "")
        .replace("<AliasTarget/>", "");
    if include_weight {
        stripped
    } else {
        stripped.replace("<Weight>0</Weight>", "")
    }
}

/// Decodes the error document of a non-200 answer.
pub fn decode_error(xml: &str) -> Result<ErrorResponse> {
    from_xml::<WireErrorResponse>(xml).map(WireErrorResponse::into_domain)
}

/// Leading and trailing whitespace of text content is trimmed, so a value
/// that only differs from another by surrounding spaces decodes to the same
/// string. Entities are unescaped after trimming.
fn from_xml<T: DeserializeOwned>(xml: &str) -> Result<T> {
    quick_xml::de::from_str(xml).map_err(|e| {
        log::debug!("[route53] XML decode failed: {e}, body: {}", truncate_for_log(xml));
        Route53Error::Decode {
            detail: e.to_string(),
        }
    })
}

mod sealed {
    pub trait Sealed {}
}

/// Typed success payloads the executor can decode into.
///
/// Sealed: the set of response documents is closed and chosen at the call site.
/// Text content is whitespace-trimmed on decode.
pub trait ResponseShape: Sized + sealed::Sealed {
    fn decode(xml: &str) -> Result<Self>;
}

/// `ChangeResourceRecordSetsResponse` / `GetChangeResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeResponse {
    pub change_info: ChangeInfo,
}

/// `ListResourceRecordSetsResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrSetList {
    pub rrsets: Vec<ResourceRecordSet>,
    pub is_truncated: bool,
    pub next_record_name: Option<String>,
    pub next_record_type: Option<String>,
    pub next_record_identifier: Option<String>,
    pub max_items: Option<u32>,
}

/// `ListHostedZonesResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZoneList {
    pub zones: Vec<HostedZone>,
    pub is_truncated: bool,
    pub next_marker: Option<String>,
    pub max_items: Option<u32>,
}

/// `GetHostedZoneResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZoneDetail {
    pub zone: HostedZone,
}

impl sealed::Sealed for ChangeResponse {}
impl sealed::Sealed for RrSetList {}
impl sealed::Sealed for HostedZoneList {}
impl sealed::Sealed for HostedZoneDetail {}

impl ResponseShape for ChangeResponse {
    fn decode(xml: &str) -> Result<Self> {
        let wire: WireChangeResponse = from_xml(xml)?;
        Ok(Self {
            change_info: wire.change_info.into_domain()?,
        })
    }
}

impl ResponseShape for RrSetList {
    fn decode(xml: &str) -> Result<Self> {
        let wire: WireListRrSetsResponse = from_xml(xml)?;
        let rrsets = wire
            .rrsets
            .items
            .into_iter()
            .map(wire::WireRrSet::into_domain)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rrsets,
            is_truncated: wire.is_truncated,
            next_record_name: wire.next_record_name,
            next_record_type: wire.next_record_type,
            next_record_identifier: wire.next_record_identifier,
            max_items: wire.max_items,
        })
    }
}

impl ResponseShape for HostedZoneList {
    fn decode(xml: &str) -> Result<Self> {
        let wire: WireListHostedZonesResponse = from_xml(xml)?;
        Ok(Self {
            zones: wire
                .hosted_zones
                .items
                .into_iter()
                .map(|z| z.into_domain(Vec::new()))
                .collect(),
            is_truncated: wire.is_truncated,
            next_marker: wire.next_marker,
            max_items: wire.max_items,
        })
    }
}

impl ResponseShape for HostedZoneDetail {
    fn decode(xml: &str) -> Result<Self> {
        let wire: WireGetHostedZoneResponse = from_xml(xml)?;
        let name_servers = wire
            .delegation_set
            .map(|d| d.name_servers.items)
            .unwrap_or_default();
        Ok(Self {
            zone: wire.hosted_zone.into_domain(name_servers),
        })
    }
}
