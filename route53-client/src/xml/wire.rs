//! Route 53 XML document structure.
//!
//! Field names follow the API's element names; conversion to and from the
//! domain types happens here so the rest of the crate never sees wire shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, Route53Error};
use crate::types::{
    AliasTarget, ChangeBatch, ChangeInfo, ChangeStatus, ErrorResponse, FailoverRole, HostedZone,
    ResourceRecordSet,
};

use super::CodecOptions;

// ============ Change batch request ============

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "ChangeResourceRecordSetsRequest")]
pub(crate) struct WireChangeRequest {
    #[serde(rename = "@xmlns", default)]
    pub xmlns: String,
    #[serde(rename = "ChangeBatch")]
    pub change_batch: WireChangeBatch,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireChangeBatch {
    #[serde(rename = "Comment", default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(rename = "Changes")]
    pub changes: WireChanges,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireChanges {
    #[serde(rename = "Change", default)]
    pub items: Vec<WireChange>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireChange {
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "ResourceRecordSet")]
    pub rrset: WireRrSet,
}

impl WireChangeRequest {
    pub fn from_domain(batch: &ChangeBatch, options: &CodecOptions) -> Self {
        Self {
            xmlns: options.xmlns.clone(),
            change_batch: WireChangeBatch {
                comment: batch.comment.clone(),
                changes: WireChanges {
                    items: batch
                        .changes
                        .iter()
                        .map(|c| WireChange {
                            action: c.action.as_str().to_string(),
                            rrset: WireRrSet::from_domain(&c.rrset, options),
                        })
                        .collect(),
                },
            },
        }
    }

    #[cfg(test)]
    pub fn into_domain(self) -> Result<ChangeBatch> {
        let changes = self
            .change_batch
            .changes
            .items
            .into_iter()
            .map(|c| {
                Ok(crate::types::Change {
                    action: c.action.parse::<crate::types::ChangeAction>()?,
                    rrset: c.rrset.into_domain()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ChangeBatch {
            comment: self.change_batch.comment,
            changes,
        })
    }
}

// ============ Record sets ============

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct WireRrSet {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "TTL", default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(
        rename = "ResourceRecords",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_records: Option<WireResourceRecords>,
    #[serde(
        rename = "HealthCheckId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub health_check_id: Option<String>,
    #[serde(
        rename = "SetIdentifier",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub set_identifier: Option<String>,
    #[serde(rename = "Weight", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u8>,
    #[serde(rename = "AliasTarget", default, skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<WireAliasTarget>,
    #[serde(rename = "Failover", default, skip_serializing_if = "Option::is_none")]
    pub failover: Option<String>,
    #[serde(rename = "Region", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct WireResourceRecords {
    #[serde(rename = "ResourceRecord", default)]
    pub items: Vec<WireResourceRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireResourceRecord {
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireAliasTarget {
    #[serde(rename = "HostedZoneId", default)]
    pub hosted_zone_id: String,
    #[serde(rename = "DNSName", default)]
    pub dns_name: String,
    #[serde(rename = "EvaluateTargetHealth", default)]
    pub evaluate_target_health: bool,
}

impl WireRrSet {
    /// Applies the omission rules for one record set.
    ///
    /// - An alias target with neither zone id nor DNS name is dropped; a present
    ///   one keeps all three children.
    /// - A zero weight is dropped unless `include_weight` is set.
    /// - Alias records carry no TTL; empty value lists carry no
    ///   `ResourceRecords` element.
    pub fn from_domain(rrset: &ResourceRecordSet, options: &CodecOptions) -> Self {
        let alias_target = rrset
            .alias_target
            .as_ref()
            .filter(|a| !a.hosted_zone_id.is_empty() || !a.dns_name.is_empty())
            .map(|a| WireAliasTarget {
                hosted_zone_id: a.hosted_zone_id.clone(),
                dns_name: a.dns_name.clone(),
                evaluate_target_health: a.evaluate_target_health,
            });

        let resource_records = (!rrset.values.is_empty()).then(|| WireResourceRecords {
            items: rrset
                .values
                .iter()
                .map(|v| WireResourceRecord { value: v.clone() })
                .collect(),
        });

        Self {
            name: rrset.name.clone(),
            record_type: rrset.record_type.clone(),
            ttl: alias_target.is_none().then_some(rrset.ttl),
            resource_records,
            health_check_id: rrset.health_check_id.clone(),
            set_identifier: rrset.set_identifier.clone(),
            weight: rrset.weight.filter(|w| *w != 0 || options.include_weight),
            alias_target,
            failover: rrset.failover.map(|f| f.as_str().to_string()),
            region: rrset.region.clone(),
        }
    }

    pub fn into_domain(self) -> Result<ResourceRecordSet> {
        Ok(ResourceRecordSet {
            name: self.name,
            record_type: self.record_type,
            ttl: self.ttl.unwrap_or(0),
            values: self
                .resource_records
                .map(|r| r.items.into_iter().map(|i| i.value).collect())
                .unwrap_or_default(),
            health_check_id: self.health_check_id,
            set_identifier: self.set_identifier,
            weight: self.weight,
            alias_target: self.alias_target.map(|a| AliasTarget {
                hosted_zone_id: a.hosted_zone_id,
                dns_name: a.dns_name,
                evaluate_target_health: a.evaluate_target_health,
            }),
            failover: self.failover.as_deref().map(str::parse::<FailoverRole>).transpose()?,
            region: self.region,
        })
    }
}

// ============ Responses ============

#[derive(Debug, Deserialize)]
pub(crate) struct WireChangeInfo {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "SubmittedAt")]
    pub submitted_at: String,
    #[serde(rename = "Comment", default)]
    pub comment: Option<String>,
}

impl WireChangeInfo {
    pub fn into_domain(self) -> Result<ChangeInfo> {
        let submitted_at = DateTime::parse_from_rfc3339(&self.submitted_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Route53Error::Decode {
                detail: format!("invalid SubmittedAt '{}': {e}", self.submitted_at),
            })?;
        Ok(ChangeInfo {
            id: strip_prefix(&self.id, "/change/"),
            status: ChangeStatus::parse(&self.status),
            submitted_at,
            comment: self.comment,
        })
    }
}

/// `ChangeResourceRecordSetsResponse` and `GetChangeResponse`.
#[derive(Debug, Deserialize)]
pub(crate) struct WireChangeResponse {
    #[serde(rename = "ChangeInfo")]
    pub change_info: WireChangeInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireListRrSetsResponse {
    #[serde(rename = "ResourceRecordSets", default)]
    pub rrsets: WireRrSets,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    #[serde(rename = "NextRecordName", default)]
    pub next_record_name: Option<String>,
    #[serde(rename = "NextRecordType", default)]
    pub next_record_type: Option<String>,
    #[serde(rename = "NextRecordIdentifier", default)]
    pub next_record_identifier: Option<String>,
    #[serde(rename = "MaxItems", default)]
    pub max_items: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireRrSets {
    #[serde(rename = "ResourceRecordSet", default)]
    pub items: Vec<WireRrSet>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireHostedZone {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CallerReference", default)]
    pub caller_reference: String,
    #[serde(rename = "Config", default)]
    pub config: Option<WireZoneConfig>,
    #[serde(rename = "ResourceRecordSetCount", default)]
    pub resource_record_set_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireZoneConfig {
    #[serde(rename = "Comment", default)]
    pub comment: Option<String>,
    #[serde(rename = "PrivateZone", default)]
    pub private_zone: bool,
}

impl WireHostedZone {
    pub fn into_domain(self, name_servers: Vec<String>) -> HostedZone {
        let (comment, private_zone) = self
            .config
            .map_or((None, false), |c| (c.comment, c.private_zone));
        HostedZone {
            id: strip_prefix(&self.id, "/hostedzone/"),
            name: self.name,
            caller_reference: self.caller_reference,
            comment,
            private_zone,
            resource_record_set_count: self.resource_record_set_count,
            name_servers,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireListHostedZonesResponse {
    #[serde(rename = "HostedZones", default)]
    pub hosted_zones: WireHostedZones,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    #[serde(rename = "NextMarker", default)]
    pub next_marker: Option<String>,
    #[serde(rename = "MaxItems", default)]
    pub max_items: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireHostedZones {
    #[serde(rename = "HostedZone", default)]
    pub items: Vec<WireHostedZone>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireGetHostedZoneResponse {
    #[serde(rename = "HostedZone")]
    pub hosted_zone: WireHostedZone,
    #[serde(rename = "DelegationSet", default)]
    pub delegation_set: Option<WireDelegationSet>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDelegationSet {
    #[serde(rename = "NameServers", default)]
    pub name_servers: WireNameServers,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireNameServers {
    #[serde(rename = "NameServer", default)]
    pub items: Vec<String>,
}

// ============ Errors ============

#[derive(Debug, Deserialize)]
pub(crate) struct WireErrorResponse {
    #[serde(rename = "Error")]
    pub error: WireError,
    #[serde(rename = "RequestId", default)]
    pub request_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireError {
    #[serde(rename = "Type", default)]
    pub error_type: String,
    #[serde(rename = "Code", default)]
    pub code: String,
    #[serde(rename = "Message", default)]
    pub message: String,
}

impl WireErrorResponse {
    pub fn into_domain(self) -> ErrorResponse {
        ErrorResponse {
            error_type: self.error.error_type,
            code: self.error.code,
            message: self.error.message,
            request_id: self.request_id,
        }
    }
}

/// `/hostedzone/Z1` -> `Z1`
pub(crate) fn strip_prefix(id: &str, prefix: &str) -> String {
    id.strip_prefix(prefix).unwrap_or(id).to_string()
}
