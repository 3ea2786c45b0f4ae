//! Descriptor types and client configuration.

use serde::{Deserialize, Serialize};

use crate::digest::Digest;

/// OCI content descriptor as resolved from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Media type of the referenced content.
    #[serde(rename = "mediaType")]
    pub media_type: String,

    /// Content digest.
    pub digest: Digest,

    /// Size in bytes.
    pub size: u64,
}

/// An artifact attached to a subject, discovered through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferrerDescriptor {
    /// Artifact type of the referrer (e.g. the cosign signature type).
    #[serde(rename = "artifactType")]
    pub artifact_type: String,

    /// Descriptor fields of the referrer manifest.
    #[serde(flatten)]
    pub descriptor: Descriptor,
}

/// Registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL override. When unset, the registry host of each reference is used.
    #[serde(default)]
    pub url: Option<String>,

    /// Authentication token.
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Talk plain HTTP to registry hosts.
    #[serde(default)]
    pub insecure: bool,
}

fn default_timeout() -> u64 {
    30
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_secs: default_timeout(),
            insecure: false,
        }
    }
}

impl RegistryConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `REFERRER_REGISTRY_URL` | Registry base URL override |
    /// | `REFERRER_REGISTRY_TOKEN` | Authentication token |
    /// | `REFERRER_REGISTRY_TIMEOUT` | Request timeout in seconds |
    /// | `REFERRER_REGISTRY_INSECURE` | Use `http://` for registry hosts |
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REFERRER_REGISTRY_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            token: std::env::var("REFERRER_REGISTRY_TOKEN")
                .ok()
                .filter(|v| !v.is_empty()),
            timeout_secs: std::env::var("REFERRER_REGISTRY_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
            insecure: std::env::var("REFERRER_REGISTRY_INSECURE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Set the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Use plain HTTP for registry hosts.
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Base URL for a registry host.
    pub fn base_url_for(&self, registry: &str) -> String {
        match &self.url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if self.insecure => format!("http://{}", registry),
            None => format!("https://{}", registry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "REFERRER_REGISTRY_URL",
            "REFERRER_REGISTRY_TOKEN",
            "REFERRER_REGISTRY_TIMEOUT",
            "REFERRER_REGISTRY_INSECURE",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_referrer_descriptor_json_shape() {
        let referrer = ReferrerDescriptor {
            artifact_type: "application/vnd.dev.cosign.artifact.sig.v1+json".to_string(),
            descriptor: Descriptor {
                media_type: "application/vnd.oci.image.manifest.v1+json".to_string(),
                digest: Digest::sha256_of(b"{}"),
                size: 2,
            },
        };

        let json = serde_json::to_value(&referrer).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "artifactType": "application/vnd.dev.cosign.artifact.sig.v1+json",
                "mediaType": "application/vnd.oci.image.manifest.v1+json",
                "digest": "sha256:44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a",
                "size": 2
            })
        );
    }

    #[test]
    fn test_base_url_for() {
        let config = RegistryConfig::default();
        assert_eq!(config.base_url_for("ghcr.io"), "https://ghcr.io");

        let config = RegistryConfig::default().with_insecure(true);
        assert_eq!(config.base_url_for("localhost:5000"), "http://localhost:5000");

        let config = RegistryConfig::default().with_url("http://127.0.0.1:8080/");
        assert_eq!(config.base_url_for("ghcr.io"), "http://127.0.0.1:8080");
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        std::env::set_var("REFERRER_REGISTRY_TOKEN", "env-token");
        std::env::set_var("REFERRER_REGISTRY_TIMEOUT", "5");
        std::env::set_var("REFERRER_REGISTRY_INSECURE", "true");
        let config = RegistryConfig::from_env();
        clear_env();

        assert_eq!(config.token.as_deref(), Some("env-token"));
        assert_eq!(config.timeout_secs, 5);
        assert!(config.insecure);
        assert!(config.url.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("REFERRER_REGISTRY_TOKEN", "");
        std::env::set_var("REFERRER_REGISTRY_TIMEOUT", "not-a-number");
        let config = RegistryConfig::from_env();
        clear_env();

        assert!(config.token.is_none());
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.insecure);
    }
}
