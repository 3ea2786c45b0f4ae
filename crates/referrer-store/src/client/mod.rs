//! Registry client for resolving manifests.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::auth::AuthCache;
use crate::cosign::resolve_cosign_referrers;
use crate::error::{RegistryError, RegistryResult};
use crate::reference::SubjectRef;
use crate::repository::Repository;
use crate::types::{Descriptor, ReferrerDescriptor, RegistryConfig};

mod http;

use http::HttpBackend;

const USER_AGENT_VALUE: &str = concat!("referrer-store/", env!("CARGO_PKG_VERSION"));

/// User agent sent with every registry request.
pub const REGISTRY_USER_AGENT: &str = USER_AGENT_VALUE;

/// Registry client speaking the OCI distribution API.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: HttpBackend,
    config: RegistryConfig,
    credentials: Arc<AuthCache>,
}

impl RegistryClient {
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        Self::with_auth_cache(config, Arc::new(AuthCache::new()))
    }

    /// Create a client sharing an existing credential cache.
    pub fn with_auth_cache(
        config: RegistryConfig,
        credentials: Arc<AuthCache>,
    ) -> RegistryResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| RegistryError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend {
                client,
                token: config.token.clone(),
            },
            config,
            credentials,
        })
    }

    pub fn from_env() -> RegistryResult<Self> {
        Self::new(RegistryConfig::from_env())
    }

    /// Credential cache consulted for per-subject tokens.
    pub fn auth_cache(&self) -> &Arc<AuthCache> {
        &self.credentials
    }

    /// Repository handle for `subject`, authenticated with its cached credential.
    ///
    /// The credential is looked up under the subject's original reference
    /// string, the same key eviction uses.
    pub fn repository(&self, subject: &SubjectRef) -> RemoteRepository {
        RemoteRepository {
            http: self.http.clone(),
            config: self.config.clone(),
            token: self.credentials.token(subject.original()),
        }
    }

    /// Resolve cosign signatures attached to `subject`.
    pub async fn cosign_referrers(
        &self,
        subject: &SubjectRef,
    ) -> RegistryResult<Vec<ReferrerDescriptor>> {
        let repository = self.repository(subject);
        resolve_cosign_referrers(subject, self.credentials.as_ref(), &repository).await
    }
}

/// A registry repository reached over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteRepository {
    http: HttpBackend,
    config: RegistryConfig,
    token: Option<String>,
}

impl RemoteRepository {
    fn manifest_url(&self, reference: &SubjectRef) -> RegistryResult<String> {
        let target = match (reference.digest(), reference.tag()) {
            (Some(digest), _) => digest.to_string(),
            (None, Some(tag)) => tag.to_string(),
            (None, None) => {
                return Err(RegistryError::InvalidReference {
                    reference: reference.original().to_string(),
                    reason: "tag or digest required to resolve".to_string(),
                })
            }
        };

        Ok(format!(
            "{}/v2/{}/manifests/{}",
            self.config.base_url_for(reference.registry()),
            reference.repository(),
            target
        ))
    }
}

#[async_trait]
impl Repository for RemoteRepository {
    async fn resolve(&self, reference: &str) -> RegistryResult<Descriptor> {
        let parsed = SubjectRef::parse(reference)?;
        let url = self.manifest_url(&parsed)?;
        debug!(reference = %reference, url = %url, "resolving reference");

        self.http
            .fetch_manifest(&url, reference, self.token.as_deref())
            .await
    }
}
