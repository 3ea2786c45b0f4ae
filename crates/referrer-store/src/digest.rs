//! Content-addressable digests (`algorithm:hex`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256};

use crate::error::{RegistryError, RegistryResult};

/// A validated content digest such as `sha256:d34db33f...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: String,
    hex: String,
}

impl Digest {
    /// Parse and validate a digest string.
    ///
    /// The algorithm is lowercase alphanumerics optionally joined by `+`, `.`,
    /// `_` or `-`. The encoded part is lowercase hex. Hash length is not
    /// checked against the algorithm.
    pub fn parse(digest: &str) -> RegistryResult<Self> {
        let invalid = |reason: &str| RegistryError::InvalidDigest {
            digest: digest.to_string(),
            reason: reason.to_string(),
        };

        let (algorithm, hex) = digest
            .split_once(':')
            .ok_or_else(|| invalid("missing ':' separator"))?;

        if algorithm.is_empty() {
            return Err(invalid("empty algorithm"));
        }
        if !algorithm.split(['+', '.', '_', '-']).all(|component| {
            !component.is_empty()
                && component
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        }) {
            return Err(invalid("malformed algorithm"));
        }

        if hex.is_empty() {
            return Err(invalid("empty encoded part"));
        }
        if !hex
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(invalid("encoded part must be lowercase hex"));
        }

        Ok(Self {
            algorithm: algorithm.to_string(),
            hex: hex.to_string(),
        })
    }

    /// Digest algorithm (e.g. `sha256`).
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Hex-encoded hash.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// SHA-256 digest of in-memory content.
    pub fn sha256_of(bytes: &[u8]) -> Self {
        Self {
            algorithm: "sha256".to_string(),
            hex: hex::encode(Sha256::digest(bytes)),
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

impl FromStr for Digest {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
