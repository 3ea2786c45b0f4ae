//! Cosign signature discovery for OCI registries.
//!
//! This crate finds the cosign signature attached to a subject artifact by
//! resolving the tag cosign derives from the subject digest
//! (`repo:sha256-<hex>.sig`). It provides:
//!
//! - The attached tag convention transform
//! - A resolver that classifies registry answers into "found",
//!   "not found" and "credentials rejected" (which evicts the cached credential)
//! - An HTTP repository speaking the OCI distribution API
//! - An in-memory credential cache
//! - The verifier plugin result envelope
//!
//! # Quick Start
//!
//! ```no_run
//! use referrer_store::{RegistryClient, RegistryConfig, SubjectRef};
//!
//! # async fn example() -> Result<(), referrer_store::RegistryError> {
//! let client = RegistryClient::new(RegistryConfig::from_env())?;
//! let subject = SubjectRef::parse("ghcr.io/org/app@sha256:d34db33f")?;
//!
//! for referrer in client.cosign_referrers(&subject).await? {
//!     println!("{} {}", referrer.artifact_type, referrer.descriptor.digest);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `REFERRER_REGISTRY_URL` | Base URL override (default: `https://<registry host>`) |
//! | `REFERRER_REGISTRY_TOKEN` | Authentication token |
//! | `REFERRER_REGISTRY_TIMEOUT` | Request timeout in seconds (default: 30) |
//! | `REFERRER_REGISTRY_INSECURE` | Use plain HTTP for registry hosts |

pub mod auth;
pub mod client;
pub mod cosign;
pub mod digest;
pub mod error;
pub mod plugin;
pub mod reference;
pub mod repository;
pub mod types;

// Re-export main types
pub use auth::{AuthCache, CacheEvictor, CachedCredential};
pub use client::{RegistryClient, RemoteRepository, REGISTRY_USER_AGENT};
pub use cosign::{
    attached_image_tag, resolve_cosign_referrers, COSIGN_ARTIFACT_TYPE,
    COSIGN_SIGNATURE_TAG_SUFFIX,
};
pub use digest::Digest;
pub use error::{RegistryError, RegistryResult};
pub use plugin::{
    decode_verifier_result, write_verifier_result, PluginError, PluginErrorCode, VerifierResult,
};
pub use reference::SubjectRef;
pub use repository::Repository;
pub use types::{Descriptor, ReferrerDescriptor, RegistryConfig};
