//! Typed Route 53 operations.
//!
//! Every method here only builds a [`Request`] and hands it to the
//! [`Executor`]; signing, encoding, classification and the 403 retry all live
//! there.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::credentials::{CredentialProvider, CredentialSource, EnvCredentialSource};
use crate::error::{Result, Route53Error};
use crate::executor::Executor;
use crate::http_client::{ReqwestTransport, Transport};
use crate::request::{Request, RequestBody};
use crate::types::{
    Change, ChangeBatch, ChangeInfo, HostedZone, ListRrSetsParams, ResourceRecordSet,
};
use crate::xml::{ChangeResponse, HostedZoneDetail, HostedZoneList, RrSetList, strip_prefix};

/// Route 53 API client.
///
/// # Construction
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use route53_client::{
///     ClientConfig, CredentialProvider, Credentials, Route53Client, StaticCredentialSource,
/// };
///
/// # async fn example() -> route53_client::Result<()> {
/// let source = Arc::new(StaticCredentialSource::new(Credentials::new(
///     "your-access-key-id",
///     "your-secret-access-key",
/// )));
/// let credentials = Arc::new(CredentialProvider::initialize(source).await?);
/// let client = Route53Client::builder(credentials)
///     .config(ClientConfig::default().include_weight(true))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct Route53Client {
    executor: Executor,
}

/// Builder for [`Route53Client`].
pub struct Route53ClientBuilder {
    credentials: Arc<CredentialProvider>,
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl Route53ClientBuilder {
    fn new(credentials: Arc<CredentialProvider>) -> Self {
        Self {
            credentials,
            config: ClientConfig::default(),
            transport: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default reqwest transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<Route53Client> {
        self.config.validate()?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };
        Ok(Route53Client {
            executor: Executor::new(transport, self.credentials, self.config),
        })
    }
}

impl Route53Client {
    pub fn builder(credentials: Arc<CredentialProvider>) -> Route53ClientBuilder {
        Route53ClientBuilder::new(credentials)
    }

    /// Configuration from `ROUTE53_*` and credentials from `AWS_*` variables.
    pub async fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        let source: Arc<dyn CredentialSource> = Arc::new(EnvCredentialSource);
        let credentials = Arc::new(CredentialProvider::initialize(source).await?);
        Self::builder(credentials).config(config).build()
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Binds operations to one hosted zone.
    pub fn hosted_zone(&self, zone_id: &str) -> HostedZoneHandle<'_> {
        HostedZoneHandle {
            client: self,
            zone_id: strip_prefix(zone_id, "/hostedzone/"),
        }
    }

    // ============ Record sets ============

    /// Submits a change batch (POST `/hostedzone/{id}/rrset`).
    pub async fn change_rrsets(
        &self,
        zone_id: &str,
        changes: Vec<Change>,
        comment: &str,
    ) -> Result<ChangeInfo> {
        let batch = ChangeBatch::new(changes, comment);
        batch.validate()?;

        let request = Request::post(rrset_path(zone_id)?, RequestBody::ChangeBatch(batch));
        let response: ChangeResponse = self.executor.execute(&request).await?;
        Ok(response.change_info)
    }

    pub async fn create_rrset(
        &self,
        zone_id: &str,
        rrset: ResourceRecordSet,
        comment: &str,
    ) -> Result<ChangeInfo> {
        self.change_rrsets(zone_id, vec![Change::create(rrset)], comment)
            .await
    }

    pub async fn delete_rrset(
        &self,
        zone_id: &str,
        rrset: ResourceRecordSet,
        comment: &str,
    ) -> Result<ChangeInfo> {
        self.change_rrsets(zone_id, vec![Change::delete(rrset)], comment)
            .await
    }

    pub async fn upsert_rrset(
        &self,
        zone_id: &str,
        rrset: ResourceRecordSet,
        comment: &str,
    ) -> Result<ChangeInfo> {
        self.change_rrsets(zone_id, vec![Change::upsert(rrset)], comment)
            .await
    }

    /// Lists the record sets of a zone (GET `/hostedzone/{id}/rrset`).
    ///
    /// A truncated answer fails with `UnsupportedResult`; no partial list is
    /// ever returned.
    pub async fn list_rrsets(&self, zone_id: &str) -> Result<Vec<ResourceRecordSet>> {
        self.list_rrsets_with(zone_id, &ListRrSetsParams::default())
            .await
    }

    pub async fn list_rrsets_with(
        &self,
        zone_id: &str,
        params: &ListRrSetsParams,
    ) -> Result<Vec<ResourceRecordSet>> {
        let request = Request::get(rrset_path(zone_id)?).with_query(params.to_query()?);
        let response: RrSetList = self.executor.execute(&request).await?;

        if response.is_truncated {
            return Err(Route53Error::UnsupportedResult {
                detail: format!(
                    "cannot handle truncated responses (next record: {})",
                    response.next_record_name.as_deref().unwrap_or("?")
                ),
            });
        }
        Ok(response.rrsets)
    }

    // ============ Hosted zones ============

    /// GET `/hostedzone`; a truncated answer fails with `UnsupportedResult`.
    pub async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>> {
        let response: HostedZoneList = self.executor.execute(&Request::get("/hostedzone")).await?;

        if response.is_truncated {
            return Err(Route53Error::UnsupportedResult {
                detail: format!(
                    "cannot handle truncated responses (next marker: {})",
                    response.next_marker.as_deref().unwrap_or("?")
                ),
            });
        }
        Ok(response.zones)
    }

    /// GET `/hostedzone/{id}`, including delegation name servers.
    pub async fn get_hosted_zone(&self, zone_id: &str) -> Result<HostedZone> {
        let id = require_id("zone_id", zone_id, "/hostedzone/")?;
        let response: HostedZoneDetail = self
            .executor
            .execute(&Request::get(format!("/hostedzone/{id}")))
            .await?;
        Ok(response.zone)
    }

    /// GET `/change/{id}`: propagation status of a submitted batch.
    pub async fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        let id = require_id("change_id", change_id, "/change/")?;
        let response: ChangeResponse = self
            .executor
            .execute(&Request::get(format!("/change/{id}")))
            .await?;
        Ok(response.change_info)
    }
}

/// A hosted zone id bound to a client.
pub struct HostedZoneHandle<'a> {
    client: &'a Route53Client,
    zone_id: String,
}

impl HostedZoneHandle<'_> {
    pub fn id(&self) -> &str {
        &self.zone_id
    }

    pub async fn change_rrsets(&self, changes: Vec<Change>, comment: &str) -> Result<ChangeInfo> {
        self.client
            .change_rrsets(&self.zone_id, changes, comment)
            .await
    }

    pub async fn list_rrsets(&self) -> Result<Vec<ResourceRecordSet>> {
        self.client.list_rrsets(&self.zone_id).await
    }

    pub async fn create_rrset(&self, rrset: ResourceRecordSet, comment: &str) -> Result<ChangeInfo> {
        self.client.create_rrset(&self.zone_id, rrset, comment).await
    }

    pub async fn delete_rrset(&self, rrset: ResourceRecordSet, comment: &str) -> Result<ChangeInfo> {
        self.client.delete_rrset(&self.zone_id, rrset, comment).await
    }

    pub async fn upsert_rrset(&self, rrset: ResourceRecordSet, comment: &str) -> Result<ChangeInfo> {
        self.client.upsert_rrset(&self.zone_id, rrset, comment).await
    }

    pub async fn details(&self) -> Result<HostedZone> {
        self.client.get_hosted_zone(&self.zone_id).await
    }
}

fn require_id(param: &str, id: &str, prefix: &str) -> Result<String> {
    let id = strip_prefix(id.trim(), prefix);
    if id.is_empty() || id.contains('/') {
        return Err(Route53Error::invalid_parameter(
            param,
            format!("'{id}' is not a valid id"),
        ));
    }
    Ok(id)
}

fn rrset_path(zone_id: &str) -> Result<String> {
    let id = require_id("zone_id", zone_id, "/hostedzone/")?;
    Ok(format!("/hostedzone/{id}/rrset"))
}
