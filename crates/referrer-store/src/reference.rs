//! Subject reference parsing.
//!
//! Supports the usual OCI reference forms:
//! - `registry.example/app` → repository only
//! - `registry.example/app:v1` → tagged
//! - `registry.example/app@sha256:...` → pinned by digest
//! - `localhost:5000/team/app:v1@sha256:...` → tag and digest

use crate::digest::Digest;
use crate::error::{RegistryError, RegistryResult};

/// A parsed reference to a subject artifact.
///
/// The unparsed input is retained verbatim; it is the key the credential
/// cache stores entries under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRef {
    original: String,
    path: String,
    tag: Option<String>,
    digest: Option<Digest>,
}

impl SubjectRef {
    /// Parse a reference string.
    ///
    /// # Examples
    ///
    /// ```
    /// use referrer_store::SubjectRef;
    ///
    /// let tagged = SubjectRef::parse("localhost:5000/net-monitor:v1").unwrap();
    /// assert_eq!(tagged.path(), "localhost:5000/net-monitor");
    /// assert_eq!(tagged.tag(), Some("v1"));
    /// assert!(tagged.digest().is_none());
    /// ```
    pub fn parse(reference: &str) -> RegistryResult<Self> {
        let invalid = |reason: &str| RegistryError::InvalidReference {
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        if reference.is_empty() {
            return Err(invalid("empty reference"));
        }
        if reference.chars().any(char::is_whitespace) {
            return Err(invalid("reference may not contain whitespace"));
        }

        let (name, digest) = match reference.split_once('@') {
            Some((name, digest)) => (name, Some(Digest::parse(digest)?)),
            None => (reference, None),
        };

        // A ':' after the last '/' separates the tag; earlier ones belong to the host port.
        let last_slash = name.rfind('/');
        let (path, tag) = match name.rfind(':') {
            Some(colon) if last_slash.map_or(true, |slash| colon > slash) => {
                let tag = &name[colon + 1..];
                if tag.is_empty() {
                    return Err(invalid("empty tag"));
                }
                (&name[..colon], Some(tag.to_string()))
            }
            _ => (name, None),
        };

        let (registry, repository) = path
            .split_once('/')
            .ok_or_else(|| invalid("reference must include a registry host"))?;
        if registry.is_empty() || repository.is_empty() {
            return Err(invalid("registry and repository must not be empty"));
        }
        if repository
            .split('/')
            .any(|component| component.is_empty())
        {
            return Err(invalid("repository contains an empty path component"));
        }
        if !repository.chars().all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-' | '/')
        }) {
            return Err(invalid(
                "repository may only contain lowercase letters, digits, and separators",
            ));
        }

        Ok(Self {
            original: reference.to_string(),
            path: path.to_string(),
            tag,
            digest,
        })
    }

    /// Build a reference from parts. The original string is rendered from them.
    pub fn from_parts(path: impl Into<String>, tag: Option<String>, digest: Option<Digest>) -> Self {
        let path = path.into();
        let mut original = path.clone();
        if let Some(tag) = &tag {
            original.push(':');
            original.push_str(tag);
        }
        if let Some(digest) = &digest {
            original.push('@');
            original.push_str(&digest.to_string());
        }
        Self {
            original,
            path,
            tag,
            digest,
        }
    }

    /// The reference exactly as supplied by the caller.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// `registry/repository` without tag or digest.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Registry host (with port, if any).
    pub fn registry(&self) -> &str {
        self.path
            .split_once('/')
            .map(|(registry, _)| registry)
            .unwrap_or(&self.path)
    }

    /// Repository name within the registry.
    pub fn repository(&self) -> &str {
        self.path
            .split_once('/')
            .map(|(_, repository)| repository)
            .unwrap_or_default()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&Digest> {
        self.digest.as_ref()
    }
}

impl std::fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.original)
    }
}

impl std::str::FromStr for SubjectRef {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
