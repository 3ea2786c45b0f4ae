//! Cosign signature discovery via the attached tag convention.
//!
//! Cosign stores the signature for `repo@sha256:abc` under the tag
//! `repo:sha256-abc.sig`. Discovery is one tag resolution against the
//! subject's repository.

use tracing::{debug, warn};

use crate::auth::CacheEvictor;
use crate::error::{RegistryError, RegistryResult};
use crate::reference::SubjectRef;
use crate::repository::Repository;
use crate::types::{Descriptor, ReferrerDescriptor};

/// Artifact type reported for cosign signatures.
pub const COSIGN_ARTIFACT_TYPE: &str = "application/vnd.dev.cosign.artifact.sig.v1+json";

/// Tag suffix cosign uses for signatures.
pub const COSIGN_SIGNATURE_TAG_SUFFIX: &str = ".sig";

/// Build the tag an attached artifact is stored under.
///
/// `sha256:d34db33f` with suffix `.sig` becomes `<path>:sha256-d34db33f.sig`.
///
/// # Examples
///
/// ```
/// use referrer_store::{attached_image_tag, SubjectRef, COSIGN_SIGNATURE_TAG_SUFFIX};
///
/// let subject = SubjectRef::parse("localhost:5000/app@sha256:d34db33f").unwrap();
/// let tag = attached_image_tag(&subject, COSIGN_SIGNATURE_TAG_SUFFIX).unwrap();
/// assert_eq!(tag, "localhost:5000/app:sha256-d34db33f.sig");
/// ```
pub fn attached_image_tag(subject: &SubjectRef, tag_suffix: &str) -> RegistryResult<String> {
    let digest = subject
        .digest()
        .map(ToString::to_string)
        .filter(|digest| !digest.is_empty())
        .ok_or(RegistryError::MissingSubjectDigest)?;

    let tag = format!("{}{}", digest.replace(':', "-"), tag_suffix);
    Ok(format!("{}:{}", subject.path(), tag))
}

/// Resolve the cosign signatures attached to `subject`.
///
/// Returns an empty list when no signature tag exists. When the registry
/// rejects our credentials (401/403) the cached credential for the subject's
/// original reference string is evicted before the error is returned, so an
/// immediate retry re-authenticates. Exactly one resolution is attempted.
pub async fn resolve_cosign_referrers(
    subject: &SubjectRef,
    evictor: &dyn CacheEvictor,
    repository: &dyn Repository,
) -> RegistryResult<Vec<ReferrerDescriptor>> {
    let signature_tag = attached_image_tag(subject, COSIGN_SIGNATURE_TAG_SUFFIX)?;
    debug!(subject = %subject, tag = %signature_tag, "resolving cosign signature tag");

    let descriptor = match repository.resolve(&signature_tag).await {
        Ok(descriptor) => descriptor,
        Err(e) if e.is_not_found() => {
            debug!(tag = %signature_tag, "no cosign signature attached");
            return Ok(Vec::new());
        }
        Err(e) if e.is_auth_failure() => {
            warn!(
                subject = %subject,
                status = ?e.status(),
                "registry rejected credentials, evicting auth cache entry"
            );
            evictor.evict(subject.original(), &e);
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    Ok(vec![ReferrerDescriptor {
        artifact_type: COSIGN_ARTIFACT_TYPE.to_string(),
        descriptor: Descriptor {
            media_type: descriptor.media_type,
            digest: descriptor.digest,
            size: descriptor.size,
        },
    }])
}
