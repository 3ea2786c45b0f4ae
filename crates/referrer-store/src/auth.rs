//! Registry credential cache.
//!
//! Credentials are keyed by the subject reference string exactly as the
//! caller supplied it. Whoever populates the cache must use the same key
//! form, otherwise eviction after an auth failure silently misses.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::RegistryError;

/// Drops cached credentials after the registry rejected them.
///
/// Eviction is fire-and-forget: implementations swallow their own failures.
pub trait CacheEvictor: Send + Sync {
    /// Evict the entry stored under `key`; `cause` is the error that triggered it.
    fn evict(&self, key: &str, cause: &RegistryError);
}

/// A cached registry credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCredential {
    /// Bearer token.
    pub token: String,

    /// When the credential stops being usable.
    pub expires_at: Option<DateTime<Utc>>,
}

/// In-memory credential cache.
#[derive(Debug, Default)]
pub struct AuthCache {
    entries: RwLock<HashMap<String, CachedCredential>>,
}

impl AuthCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a credential under `key`.
    pub fn insert(&self, key: impl Into<String>, credential: CachedCredential) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), credential);
        }
    }

    /// Fetch the token for `key`, skipping expired entries.
    pub fn token(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        let credential = entries.get(key)?;
        match credential.expires_at {
            Some(expires_at) if expires_at <= Utc::now() => None,
            _ => Some(credential.token.clone()),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheEvictor for AuthCache {
    fn evict(&self, key: &str, cause: &RegistryError) {
        // A poisoned lock means another writer panicked; nothing left to evict safely.
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        let removed = entries.remove(key).is_some();
        debug!(key = %key, removed, cause = %cause, "evicted cached registry credential");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(token: &str) -> CachedCredential {
        CachedCredential {
            token: token.to_string(),
            expires_at: None,
        }
    }

    fn unauthorized() -> RegistryError {
        RegistryError::Http {
            status: 401,
            message: "unauthorized".to_string(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let cache = AuthCache::new();
        cache.insert("registry.example/app:v1", credential("t1"));
        assert_eq!(
            cache.token("registry.example/app:v1"),
            Some("t1".to_string())
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_token_not_returned() {
        let cache = AuthCache::new();
        cache.insert(
            "registry.example/app",
            CachedCredential {
                token: "old".to_string(),
                expires_at: Some(Utc::now() - chrono::Duration::seconds(1)),
            },
        );
        assert_eq!(cache.token("registry.example/app"), None);
        assert!(cache.contains("registry.example/app"));
    }

    #[test]
    fn test_evict_removes_only_matching_key() {
        let cache = AuthCache::new();
        cache.insert("registry.example/app:v1", credential("t1"));
        cache.insert("registry.example/other:v1", credential("t2"));

        cache.evict("registry.example/app:v1", &unauthorized());

        assert!(!cache.contains("registry.example/app:v1"));
        assert!(cache.contains("registry.example/other:v1"));
    }

    #[test]
    fn test_evict_missing_key_is_noop() {
        let cache = AuthCache::new();
        cache.evict("registry.example/app:v1", &unauthorized());
        assert!(cache.is_empty());
    }
}
