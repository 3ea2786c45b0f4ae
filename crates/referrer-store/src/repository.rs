//! Registry repository abstraction.

use async_trait::async_trait;

use crate::error::RegistryResult;
use crate::types::Descriptor;

/// Resolves references within a registry repository.
///
/// Implementations must report a missing tag as
/// [`RegistryError::NotFound`](crate::RegistryError::NotFound) and other
/// non-success HTTP answers as
/// [`RegistryError::Http`](crate::RegistryError::Http) with the numeric status.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Resolve `reference` (`registry/repository:tag`) to a content descriptor.
    async fn resolve(&self, reference: &str) -> RegistryResult<Descriptor>;
}
