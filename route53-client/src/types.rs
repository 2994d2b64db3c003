use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, Route53Error};

// ============ Record sets ============

/// Alias routing: the record set resolves to another AWS resource instead of
/// literal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasTarget {
    /// Hosted zone id of the target resource (e.g. an ELB's zone).
    pub hosted_zone_id: String,
    /// DNS name of the target resource.
    pub dns_name: String,
    /// Whether Route 53 evaluates the target's health.
    pub evaluate_target_health: bool,
}

/// Role of a record set under failover routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FailoverRole {
    Primary,
    Secondary,
}

impl FailoverRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY",
            Self::Secondary => "SECONDARY",
        }
    }
}

impl FromStr for FailoverRole {
    type Err = Route53Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PRIMARY" => Ok(Self::Primary),
            "SECONDARY" => Ok(Self::Secondary),
            other => Err(Route53Error::Decode {
                detail: format!("unknown failover role: {other}"),
            }),
        }
    }
}

/// A named, typed group of record values sharing a TTL and routing policy.
///
/// `values` keeps insertion order and duplicates; it is sent to the API
/// exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSet {
    /// Fully qualified name, e.g. `www.example.com.`
    pub name: String,
    /// Record type, e.g. `A`, `CNAME`, `TXT`.
    pub record_type: String,
    pub ttl: u32,
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
    /// Distinguishes record sets sharing name and type under a routing policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
    /// Weighted routing (0-255).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failover: Option<FailoverRole>,
    /// Latency routing region, e.g. `us-east-1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl ResourceRecordSet {
    /// Creates a simple-routing record set.
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        ttl: u32,
        values: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            ttl,
            values,
            ..Default::default()
        }
    }

    /// Creates an alias record set. Alias records carry no literal values.
    pub fn alias(name: impl Into<String>, record_type: impl Into<String>, target: AliasTarget) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            alias_target: Some(target),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_weight(mut self, set_identifier: impl Into<String>, weight: u8) -> Self {
        self.set_identifier = Some(set_identifier.into());
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn with_failover(mut self, set_identifier: impl Into<String>, role: FailoverRole) -> Self {
        self.set_identifier = Some(set_identifier.into());
        self.failover = Some(role);
        self
    }

    #[must_use]
    pub fn with_region(mut self, set_identifier: impl Into<String>, region: impl Into<String>) -> Self {
        self.set_identifier = Some(set_identifier.into());
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn with_health_check(mut self, health_check_id: impl Into<String>) -> Self {
        self.health_check_id = Some(health_check_id.into());
        self
    }

    /// Checks routing-policy consistency.
    ///
    /// Weight, failover and region are mutually exclusive and each requires a
    /// set identifier. An alias target must name both its hosted zone and DNS
    /// name, excludes literal values, and may be combined with one routing
    /// policy (weighted alias and so on). A record without an alias target
    /// needs at least one value.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Route53Error::invalid_parameter("name", "must not be empty"));
        }
        if self.record_type.is_empty() {
            return Err(Route53Error::invalid_parameter("type", "must not be empty"));
        }

        let policies = [
            self.weight.map(|_| "Weight"),
            self.failover.map(|_| "Failover"),
            self.region.as_ref().map(|_| "Region"),
        ];
        let active: Vec<&str> = policies.into_iter().flatten().collect();
        if active.len() > 1 {
            return Err(Route53Error::invalid_parameter(
                "routing_policy",
                format!("{} are mutually exclusive on '{}'", active.join(", "), self.name),
            ));
        }
        if !active.is_empty() && self.set_identifier.is_none() {
            return Err(Route53Error::invalid_parameter(
                "set_identifier",
                format!("{} routing on '{}' requires a set identifier", active[0], self.name),
            ));
        }

        match &self.alias_target {
            Some(_) if !self.values.is_empty() => {
                return Err(Route53Error::invalid_parameter(
                    "alias_target",
                    format!("alias record '{}' must not carry values", self.name),
                ));
            }
            Some(target) if target.hosted_zone_id.is_empty() || target.dns_name.is_empty() => {
                return Err(Route53Error::invalid_parameter(
                    "alias_target",
                    format!(
                        "alias record '{}' needs both a hosted zone id and a DNS name",
                        self.name
                    ),
                ));
            }
            None if self.values.is_empty() => {
                return Err(Route53Error::invalid_parameter(
                    "values",
                    format!("record '{}' has neither values nor an alias target", self.name),
                ));
            }
            _ => {}
        }

        Ok(())
    }
}

// ============ Changes ============

/// Action applied to a record set inside a change batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Create,
    Delete,
    Upsert,
}

impl ChangeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Delete => "DELETE",
            Self::Upsert => "UPSERT",
        }
    }
}

impl FromStr for ChangeAction {
    type Err = Route53Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CREATE" => Ok(Self::Create),
            "DELETE" => Ok(Self::Delete),
            "UPSERT" => Ok(Self::Upsert),
            other => Err(Route53Error::Decode {
                detail: format!("unknown change action: {other}"),
            }),
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub action: ChangeAction,
    pub rrset: ResourceRecordSet,
}

impl Change {
    pub fn create(rrset: ResourceRecordSet) -> Self {
        Self {
            action: ChangeAction::Create,
            rrset,
        }
    }

    pub fn delete(rrset: ResourceRecordSet) -> Self {
        Self {
            action: ChangeAction::Delete,
            rrset,
        }
    }

    pub fn upsert(rrset: ResourceRecordSet) -> Self {
        Self {
            action: ChangeAction::Upsert,
            rrset,
        }
    }
}

/// Ordered set of changes applied atomically to one hosted zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBatch {
    /// Free-form comment. Omitted from the document when empty.
    pub comment: String,
    pub changes: Vec<Change>,
}

impl ChangeBatch {
    pub fn new(changes: Vec<Change>, comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            changes,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.changes.is_empty() {
            return Err(Route53Error::invalid_parameter(
                "changes",
                "a change batch needs at least one change",
            ));
        }
        self.changes.iter().try_for_each(|c| c.rrset.validate())
    }
}

// ============ Acknowledgements ============

/// Propagation state of a submitted change batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeStatus {
    Pending,
    Insync,
    /// Any status string this client does not know yet.
    Unknown,
}

impl ChangeStatus {
    pub(crate) fn parse(s: &str) -> Self {
        match s {
            "PENDING" => Self::Pending,
            "INSYNC" => Self::Insync,
            _ => Self::Unknown,
        }
    }
}

/// Server acknowledgement of a change batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    /// Change id without the `/change/` prefix.
    pub id: String,
    pub status: ChangeStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// ============ Hosted zones ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedZone {
    /// Zone id without the `/hostedzone/` prefix.
    pub id: String,
    pub name: String,
    pub caller_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub private_zone: bool,
    pub resource_record_set_count: Option<u64>,
    /// Delegation set name servers; only filled by `get_hosted_zone`.
    pub name_servers: Vec<String>,
}

// ============ Errors ============

/// Decoded body of any non-200 answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_type: String,
    pub code: String,
    pub message: String,
    pub request_id: String,
}

impl ErrorResponse {
    pub(crate) fn into_error(self, status: u16) -> Route53Error {
        Route53Error::Remote {
            status,
            error_type: self.error_type,
            code: self.code,
            message: self.message,
            request_id: self.request_id,
        }
    }
}

// ============ Query ============

/// Optional filters for `ListResourceRecordSets`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRrSetsParams {
    /// Start listing at this name (lexicographic).
    pub name: Option<String>,
    /// Start listing at this type; requires `name`.
    pub record_type: Option<String>,
    pub max_items: Option<u32>,
}

impl ListRrSetsParams {
    pub(crate) fn to_query(&self) -> Result<Vec<(String, String)>> {
        if self.record_type.is_some() && self.name.is_none() {
            return Err(Route53Error::invalid_parameter(
                "type",
                "filtering by type requires a start name",
            ));
        }

        let mut query = Vec::new();
        if let Some(name) = &self.name {
            query.push(("name".to_string(), name.clone()));
        }
        if let Some(record_type) = &self.record_type {
            query.push(("type".to_string(), record_type.clone()));
        }
        if let Some(max_items) = self.max_items {
            query.push(("maxitems".to_string(), max_items.to_string()));
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted() -> ResourceRecordSet {
        ResourceRecordSet::new("www.example.com.", "A", 300, vec!["192.0.2.1".into()])
            .with_weight("blue", 10)
    }

    #[test]
    fn simple_record_is_valid() {
        let rrset = ResourceRecordSet::new("www.example.com.", "A", 300, vec!["192.0.2.1".into()]);
        assert!(rrset.validate().is_ok());
    }

    #[test]
    fn weighted_record_is_valid() {
        assert!(weighted().validate().is_ok());
    }

    #[test]
    fn two_routing_policies_rejected() {
        let mut rrset = weighted();
        rrset.region = Some("us-east-1".into());
        let err = rrset.validate().unwrap_err();
        assert!(
            matches!(&err, Route53Error::InvalidParameter { param, .. } if param == "routing_policy"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn routing_policy_needs_set_identifier() {
        let mut rrset = weighted();
        rrset.set_identifier = None;
        let err = rrset.validate().unwrap_err();
        assert!(
            matches!(&err, Route53Error::InvalidParameter { param, .. } if param == "set_identifier"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn alias_with_values_rejected() {
        let mut rrset = ResourceRecordSet::alias(
            "example.com.",
            "A",
            AliasTarget {
                hosted_zone_id: "Z2FDTNDATAQYW2".into(),
                dns_name: "d111111abcdef8.cloudfront.net.".into(),
                evaluate_target_health: false,
            },
        );
        assert!(rrset.validate().is_ok());
        rrset.values.push("192.0.2.1".into());
        assert!(rrset.validate().is_err());
    }

    #[test]
    fn weighted_alias_is_valid() {
        let rrset = ResourceRecordSet::alias(
            "example.com.",
            "A",
            AliasTarget {
                hosted_zone_id: "Z2FDTNDATAQYW2".into(),
                dns_name: "d111111abcdef8.cloudfront.net.".into(),
                evaluate_target_health: true,
            },
        )
        .with_weight("cdn", 50);
        assert!(rrset.validate().is_ok());
    }

    #[test]
    fn partial_alias_target_rejected() {
        let missing_name = ResourceRecordSet::alias(
            "example.com.",
            "A",
            AliasTarget {
                hosted_zone_id: "Z2FDTNDATAQYW2".into(),
                dns_name: String::new(),
                evaluate_target_health: false,
            },
        );
        let missing_zone = ResourceRecordSet::alias(
            "example.com.",
            "A",
            AliasTarget {
                hosted_zone_id: String::new(),
                dns_name: "d111111abcdef8.cloudfront.net.".into(),
                evaluate_target_health: false,
            },
        );
        let empty = ResourceRecordSet::alias(
            "example.com.",
            "A",
            AliasTarget {
                hosted_zone_id: String::new(),
                dns_name: String::new(),
                evaluate_target_health: true,
            },
        );

        for rrset in [missing_name, missing_zone, empty] {
            let err = rrset.validate().unwrap_err();
            assert!(
                matches!(&err, Route53Error::InvalidParameter { param, .. } if param == "alias_target"),
                "{err:?}"
            );
        }
    }

    #[test]
    fn record_without_values_or_alias_rejected() {
        let rrset = ResourceRecordSet::new("www.example.com.", "A", 300, Vec::new());
        let err = rrset.validate().unwrap_err();
        assert!(
            matches!(&err, Route53Error::InvalidParameter { param, .. } if param == "values"),
            "{err:?}"
        );
    }

    #[test]
    fn empty_batch_rejected() {
        let batch = ChangeBatch::new(vec![], "nothing");
        assert!(batch.validate().is_err());
    }

    #[test]
    fn values_keep_order_and_duplicates() {
        let rrset = ResourceRecordSet::new(
            "txt.example.com.",
            "TXT",
            60,
            vec!["\"b\"".into(), "\"a\"".into(), "\"b\"".into()],
        );
        assert_eq!(rrset.values, vec!["\"b\"", "\"a\"", "\"b\""]);
    }

    #[test]
    fn action_round_trips_through_str() {
        for action in [ChangeAction::Create, ChangeAction::Delete, ChangeAction::Upsert] {
            assert_eq!(action.as_str().parse::<ChangeAction>().unwrap(), action);
        }
        assert!("REPLACE".parse::<ChangeAction>().is_err());
    }

    #[test]
    fn list_params_to_query() {
        let params = ListRrSetsParams {
            name: Some("www.example.com.".into()),
            record_type: Some("A".into()),
            max_items: Some(100),
        };
        assert_eq!(
            params.to_query().unwrap(),
            vec![
                ("name".to_string(), "www.example.com.".to_string()),
                ("type".to_string(), "A".to_string()),
                ("maxitems".to_string(), "100".to_string()),
            ]
        );
    }

    #[test]
    fn list_params_type_without_name_rejected() {
        let params = ListRrSetsParams {
            record_type: Some("A".into()),
            ..Default::default()
        };
        assert!(params.to_query().is_err());
    }
}
