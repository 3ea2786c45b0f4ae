use clap::{Parser, Subcommand};
use std::path::PathBuf;

use referrer_store::COSIGN_SIGNATURE_TAG_SUFFIX;

#[derive(Parser)]
#[command(
    name = "referrer",
    version,
    about = "Discover cosign signatures attached to OCI artifacts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the tag an attached artifact is stored under
    Tag(TagArgs),
    /// Resolve cosign signatures attached to a subject
    Referrers(ReferrersArgs),
    /// Decode a verifier plugin result and re-emit it
    PluginResult(PluginResultArgs),
    Version,
}

#[derive(Parser, Clone)]
pub struct TagArgs {
    /// Subject reference, e.g. ghcr.io/org/app@sha256:...
    pub subject: String,

    #[arg(long, default_value = COSIGN_SIGNATURE_TAG_SUFFIX)]
    pub suffix: String,
}

#[derive(Parser, Clone)]
pub struct ReferrersArgs {
    /// Subject reference, e.g. ghcr.io/org/app@sha256:...
    pub subject: String,

    /// Registry base URL override
    #[arg(long, env = "REFERRER_REGISTRY_URL")]
    pub url: Option<String>,

    /// Bearer token
    #[arg(long, env = "REFERRER_REGISTRY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "REFERRER_REGISTRY_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Use plain HTTP for the registry host
    #[arg(long)]
    pub insecure: bool,
}

#[derive(Parser, Clone)]
pub struct PluginResultArgs {
    /// Envelope file; reads stdin when omitted or "-"
    pub input: Option<PathBuf>,
}
