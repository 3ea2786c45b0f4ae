//! HTTP layer: request construction and status mapping.
//!
//! This is the ONLY place for status code handling. client/mod.rs never
//! interprets status codes.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::digest::Digest;
use crate::error::{RegistryError, RegistryResult};
use crate::types::Descriptor;

/// Manifest media types we accept when resolving a tag.
pub(crate) const MANIFEST_ACCEPT: &str = "application/vnd.oci.image.manifest.v1+json, \
application/vnd.oci.image.index.v1+json, \
application/vnd.docker.distribution.manifest.v2+json, \
application/vnd.docker.distribution.manifest.list.v2+json";

const DOCKER_CONTENT_DIGEST: &str = "docker-content-digest";

/// Upper bound on error body text carried into errors.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Largest manifest body we read; registries commonly reject manifests above 4 MiB.
pub(crate) const MAX_MANIFEST_BYTES: u64 = 4 * 1_024 * 1_024;

/// HTTP backend for making requests (holds reqwest client and auth token).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) token: Option<String>,
}

impl HttpBackend {
    /// Fetch a manifest and describe it. One request, no retries.
    pub(crate) async fn fetch_manifest(
        &self,
        url: &str,
        reference: &str,
        token: Option<&str>,
    ) -> RegistryResult<Descriptor> {
        let mut response = self.request_once(url, reference, token).await?;
        if let Some(declared) = response.content_length() {
            check_manifest_size(declared)?;
        }

        let header_digest = response
            .headers()
            .get(DOCKER_CONTENT_DIGEST)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty());

        // Content-Length may be absent (chunked) or wrong; enforce the cap while reading.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| RegistryError::Network {
            message: format!("failed to read manifest body: {}", e),
        })? {
            check_manifest_size((body.len() + chunk.len()) as u64)?;
            body.extend_from_slice(&chunk);
        }

        describe_manifest(&body, content_type, header_digest.as_deref())
    }

    async fn request_once(
        &self,
        url: &str,
        reference: &str,
        token: Option<&str>,
    ) -> RegistryResult<reqwest::Response> {
        let mut request = self.client.get(url).header(ACCEPT, MANIFEST_ACCEPT);

        if let Some(token) = token.or(self.token.as_deref()) {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        debug!(url = %url, "resolving manifest");
        let response = request.send().await?;
        let status = response.status();

        match status.as_u16() {
            200..=299 => Ok(response),

            404 => Err(RegistryError::NotFound {
                reference: reference.to_string(),
            }),

            _ => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| status.to_string());
                let message = if body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                } else {
                    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
                };
                Err(RegistryError::Http {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

fn check_manifest_size(size: u64) -> RegistryResult<()> {
    if size > MAX_MANIFEST_BYTES {
        return Err(RegistryError::InvalidResponse {
            message: format!(
                "manifest size {} exceeds limit {}",
                size, MAX_MANIFEST_BYTES
            ),
        });
    }
    Ok(())
}

/// Build a descriptor from a fetched manifest.
///
/// Media type comes from `Content-Type`, falling back to the manifest's own
/// `mediaType` field. The digest is the registry's `Docker-Content-Digest`
/// when present, otherwise the SHA-256 of the body.
pub(crate) fn describe_manifest(
    body: &[u8],
    content_type: Option<String>,
    header_digest: Option<&str>,
) -> RegistryResult<Descriptor> {
    let media_type = match content_type {
        Some(media_type) => media_type,
        None => serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                json.get("mediaType")
                    .and_then(|v| v.as_str())
                    .map(String::from)
            })
            .ok_or_else(|| RegistryError::InvalidResponse {
                message: "manifest has no media type".to_string(),
            })?,
    };

    let digest = match header_digest {
        Some(raw) => Digest::parse(raw).map_err(|e| RegistryError::InvalidResponse {
            message: format!("invalid Docker-Content-Digest header: {}", e),
        })?,
        None => Digest::sha256_of(body),
    };

    Ok(Descriptor {
        media_type,
        digest,
        size: body.len() as u64,
    })
}
