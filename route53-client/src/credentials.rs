//! Signing credentials and their refresh discipline.
//!
//! [`CredentialProvider`] is the only shared mutable state in the pipeline.
//! Reads are lock-cheap snapshots; refreshes are serialised by an async mutex
//! and tagged with a generation counter, so callers that saw the same stale
//! snapshot trigger exactly one fetch and the rest re-read its result.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};

use crate::error::{Result, Route53Error};

/// Access key pair plus optional session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    /// When temporary credentials stop being valid.
    pub expiration: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            expiration: None,
        }
    }

    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Where credentials come from.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetches a fresh set of credentials.
    async fn fetch(&self) -> Result<Credentials>;
}

// ============ Sources ============

/// Fixed credentials. A refresh returns the same values.
pub struct StaticCredentialSource {
    credentials: Credentials,
}

impl StaticCredentialSource {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialSource for StaticCredentialSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }
}

/// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`,
/// re-read on every fetch.
#[derive(Default)]
pub struct EnvCredentialSource;

#[async_trait]
impl CredentialSource for EnvCredentialSource {
    fn name(&self) -> &'static str {
        "env"
    }

    async fn fetch(&self) -> Result<Credentials> {
        let read = |var: &str| {
            std::env::var(var)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Route53Error::Auth {
                    detail: format!("environment variable {var} is not set"),
                })
        };

        let mut credentials = Credentials::new(
            read("AWS_ACCESS_KEY_ID")?,
            read("AWS_SECRET_ACCESS_KEY")?,
        );
        credentials.session_token = read("AWS_SESSION_TOKEN").ok();
        Ok(credentials)
    }
}

/// Default EC2 instance metadata endpoint.
pub const INSTANCE_METADATA_ENDPOINT: &str = "http://169.254.169.254";

const SECURITY_CREDENTIALS_PATH: &str = "/latest/meta-data/iam/security-credentials/";

/// Temporary role credentials from the instance metadata service.
pub struct InstanceMetadataSource {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RoleCredentials {
    access_key_id: String,
    secret_access_key: String,
    token: Option<String>,
    expiration: Option<DateTime<Utc>>,
}

impl InstanceMetadataSource {
    pub fn new(client: Client) -> Self {
        Self::with_endpoint(client, INSTANCE_METADATA_ENDPOINT)
    }

    pub fn with_endpoint(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let auth_error = |detail: String| Route53Error::Auth { detail };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| auth_error(format!("instance metadata request failed: {e}")))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| auth_error(format!("failed to read instance metadata: {e}")))?;

        if status != 200 {
            return Err(auth_error(format!(
                "instance metadata answered HTTP {status} for {url}"
            )));
        }
        Ok(text)
    }
}

#[async_trait]
impl CredentialSource for InstanceMetadataSource {
    fn name(&self) -> &'static str {
        "instance-metadata"
    }

    async fn fetch(&self) -> Result<Credentials> {
        let listing_url = format!("{}{SECURITY_CREDENTIALS_PATH}", self.endpoint);
        let listing = self.get_text(&listing_url).await?;
        let role = listing
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(|| Route53Error::Auth {
                detail: "no IAM role attached to this instance".to_string(),
            })?;

        let document = self.get_text(&format!("{listing_url}{role}")).await?;
        let role_credentials: RoleCredentials =
            serde_json::from_str(&document).map_err(|e| Route53Error::Auth {
                detail: format!("invalid role credentials document: {e}"),
            })?;

        log::debug!(
            "[route53] fetched role credentials for '{role}', expires {:?}",
            role_credentials.expiration
        );

        Ok(Credentials {
            access_key_id: role_credentials.access_key_id,
            secret_access_key: role_credentials.secret_access_key,
            session_token: role_credentials.token,
            expiration: role_credentials.expiration,
        })
    }
}

// ============ Provider ============

/// Credentials as seen at one point in time.
#[derive(Debug, Clone)]
pub struct CredentialSnapshot {
    pub credentials: Arc<Credentials>,
    /// Bumped by every refresh attempt, failed ones included.
    pub generation: u64,
}

struct ProviderState {
    snapshot: CredentialSnapshot,
    /// Outcome of the attempt that produced `snapshot.generation`, if it failed.
    last_error: Option<Route53Error>,
}

impl ProviderState {
    fn outcome(&self) -> Result<CredentialSnapshot> {
        match &self.last_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.snapshot.clone()),
        }
    }
}

/// Process-wide credential holder shared by every request.
pub struct CredentialProvider {
    source: Arc<dyn CredentialSource>,
    state: RwLock<ProviderState>,
    refresh_lock: Mutex<()>,
}

impl CredentialProvider {
    /// Fetches the initial credentials from `source`.
    pub async fn initialize(source: Arc<dyn CredentialSource>) -> Result<Self> {
        let credentials = source.fetch().await.map_err(into_auth_error)?;
        Ok(Self::with_credentials(source, credentials))
    }

    /// Seeds the provider without any I/O.
    pub fn with_credentials(source: Arc<dyn CredentialSource>, credentials: Credentials) -> Self {
        Self {
            source,
            state: RwLock::new(ProviderState {
                snapshot: CredentialSnapshot {
                    credentials: Arc::new(credentials),
                    generation: 0,
                },
                last_error: None,
            }),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Current snapshot. Never touches the network.
    pub async fn current(&self) -> CredentialSnapshot {
        self.state.read().await.snapshot.clone()
    }

    /// Forces a fetch from the underlying source.
    pub async fn refresh(&self) -> Result<CredentialSnapshot> {
        let _guard = self.refresh_lock.lock().await;
        self.fetch_and_store().await
    }

    /// Refreshes only if no attempt has been made since `seen_generation`.
    ///
    /// Concurrent callers holding the same stale generation queue on the
    /// refresh lock; the first one fetches, the others find a newer
    /// generation once they get the lock and share its outcome, error
    /// included, without fetching.
    pub async fn refresh_stale(&self, seen_generation: u64) -> Result<CredentialSnapshot> {
        let _guard = self.refresh_lock.lock().await;

        {
            let state = self.state.read().await;
            if state.snapshot.generation != seen_generation {
                log::debug!(
                    "[route53] credentials already refreshed (generation {} -> {})",
                    seen_generation,
                    state.snapshot.generation
                );
                return state.outcome();
            }
        }

        self.fetch_and_store().await
    }

    // Caller must hold `refresh_lock`.
    async fn fetch_and_store(&self) -> Result<CredentialSnapshot> {
        log::info!("[route53] refreshing credentials from {} source", self.source.name());

        let fetched = self.source.fetch().await;

        let mut state = self.state.write().await;
        state.snapshot.generation += 1;
        match fetched {
            Ok(credentials) => {
                state.snapshot.credentials = Arc::new(credentials);
                state.last_error = None;
            }
            Err(e) => {
                log::error!("[route53] credential refresh failed: {e}");
                // 保留旧凭证，后续请求仍可使用
                state.last_error = Some(into_auth_error(e));
            }
        }
        state.outcome()
    }
}

fn into_auth_error(e: Route53Error) -> Route53Error {
    match e {
        Route53Error::Auth { .. } => e,
        other => Route53Error::Auth {
            detail: other.to_string(),
        },
    }
}
