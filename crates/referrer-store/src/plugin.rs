//! Verifier plugin protocol.
//!
//! Out-of-process verifiers report their outcome as a JSON envelope:
//!
//! ```json
//! {"isSuccess": true, "results": ["signature verified"], "name": "cosign"}
//! ```

use std::io::Write;

use serde::{Deserialize, Deserializer, Serialize};

/// Plugin protocol version.
pub const SPEC_VERSION: &str = "0.1.0";

/// Configuration key carrying the protocol version.
pub const VERSION_KEY: &str = "version";

/// Configuration key carrying the verifier name.
pub const NAME_KEY: &str = "name";

/// Configuration key listing the artifact types a verifier handles.
pub const ARTIFACT_TYPES_KEY: &str = "artifactTypes";

/// Configuration key listing nested reference types to verify.
pub const NESTED_REFERENCES_KEY: &str = "nestedReferences";

/// Numeric error codes reported by verifier plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PluginErrorCode {
    Unknown = 0,
    ConfigParsingFailure = 1,
    InvalidVerifierConfig = 2,
    UnknownCommand = 3,
    MissingEnvironmentVariables = 4,
    IoFailure = 5,
    VersionNotSupported = 6,
    ArgsParsingFailure = 7,
    PluginCmdFailure = 8,
    InternalFailure = 999,
}

impl PluginErrorCode {
    /// Wire value of the code.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Look up a code by wire value.
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => Self::Unknown,
            1 => Self::ConfigParsingFailure,
            2 => Self::InvalidVerifierConfig,
            3 => Self::UnknownCommand,
            4 => Self::MissingEnvironmentVariables,
            5 => Self::IoFailure,
            6 => Self::VersionNotSupported,
            7 => Self::ArgsParsingFailure,
            8 => Self::PluginCmdFailure,
            999 => Self::InternalFailure,
            _ => return None,
        })
    }
}

impl std::fmt::Display for PluginErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unknown => "unknown error",
            Self::ConfigParsingFailure => "config parsing failure",
            Self::InvalidVerifierConfig => "invalid verifier config",
            Self::UnknownCommand => "unknown command",
            Self::MissingEnvironmentVariables => "missing environment variables",
            Self::IoFailure => "I/O failure",
            Self::VersionNotSupported => "version not supported",
            Self::ArgsParsingFailure => "args parsing failure",
            Self::PluginCmdFailure => "plugin command failure",
            Self::InternalFailure => "internal failure",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// Outcome of an out-of-process verification.
///
/// Absent or `null` fields decode as their empty value; plugins written
/// against encoders that emit `"results": null` for an empty list stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierResult {
    #[serde(rename = "isSuccess", default, deserialize_with = "null_as_default")]
    pub is_success: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Plugin envelope errors.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Envelope is not valid JSON of the expected shape.
    #[error("failed to parse verifier result: {0}")]
    Parse(#[from] serde_json::Error),

    /// Writing the envelope failed.
    #[error("failed to write verifier result: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginError {
    /// Protocol error code for this failure.
    pub fn code(&self) -> PluginErrorCode {
        match self {
            Self::Parse(_) => PluginErrorCode::ArgsParsingFailure,
            Self::Io(_) => PluginErrorCode::IoFailure,
        }
    }
}

/// Decode a verifier result envelope.
pub fn decode_verifier_result(bytes: &[u8]) -> Result<VerifierResult, PluginError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write a verifier result envelope to `writer`, with no trailing framing.
pub fn write_verifier_result<W: Write>(
    result: &VerifierResult,
    mut writer: W,
) -> Result<(), PluginError> {
    // serde_json::to_writer maps writer failures into serde_json::Error; keep them as I/O.
    let bytes = serde_json::to_vec(result)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
