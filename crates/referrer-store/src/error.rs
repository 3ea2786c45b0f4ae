//! Error types for referrer resolution.

/// Registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Subject reference carries no digest, so no attached tag can be derived.
    #[error("failed to mutate cosign image tag: no digest specified for subject")]
    MissingSubjectDigest,

    /// Invalid subject reference format.
    #[error("invalid reference: {reference} - {reason}")]
    InvalidReference { reference: String, reason: String },

    /// Malformed `algorithm:hex` digest.
    #[error("invalid digest: {digest} - {reason}")]
    InvalidDigest { digest: String, reason: String },

    /// Tag or manifest does not exist in the repository.
    #[error("not found: {reference}")]
    NotFound { reference: String },

    /// Registry answered with a non-success HTTP status.
    #[error("registry error: HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Network error.
    #[error("network error: {message}")]
    Network { message: String },

    /// Invalid response from registry.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl RegistryError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Not found / caller mistakes
            Self::NotFound { .. } => 1,
            Self::Config { .. } => 1,
            Self::InvalidReference { .. } => 1,
            Self::InvalidDigest { .. } => 1,
            Self::MissingSubjectDigest => 1,

            // Auth issues
            Self::Http { .. } if self.is_auth_failure() => 2,

            // Network/transient
            Self::Http { .. } => 5,
            Self::Network { .. } => 5,

            // Other
            Self::InvalidResponse { .. } => 6,
        }
    }

    /// Whether the tag or manifest was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the registry rejected our credentials (401 or 403).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
