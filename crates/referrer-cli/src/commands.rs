use std::io::Read;

use anyhow::Context;
use tracing::debug;

use referrer_store::{
    attached_image_tag, decode_verifier_result, write_verifier_result, RegistryClient,
    RegistryConfig, RegistryError, SubjectRef,
};

use crate::args::{Cli, Command, PluginResultArgs, ReferrersArgs, TagArgs};
use crate::exit_codes::{EXIT_SUCCESS, EXIT_VERIFICATION_FAILED};

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Tag(args) => cmd_tag(args),
        Command::Referrers(args) => cmd_referrers(args).await,
        Command::PluginResult(args) => cmd_plugin_result(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(EXIT_SUCCESS)
        }
    }
}

fn cmd_tag(args: TagArgs) -> anyhow::Result<i32> {
    let subject = match SubjectRef::parse(&args.subject) {
        Ok(subject) => subject,
        Err(e) => return Ok(report(&e)),
    };
    match attached_image_tag(&subject, &args.suffix) {
        Ok(tag) => {
            println!("{}", tag);
            Ok(EXIT_SUCCESS)
        }
        Err(e) => Ok(report(&e)),
    }
}

async fn cmd_referrers(args: ReferrersArgs) -> anyhow::Result<i32> {
    let mut config = RegistryConfig::from_env().with_timeout(args.timeout);
    if let Some(url) = args.url {
        config = config.with_url(url);
    }
    if let Some(token) = args.token {
        config = config.with_token(token);
    }
    if args.insecure {
        config = config.with_insecure(true);
    }

    let subject = match SubjectRef::parse(&args.subject) {
        Ok(subject) => subject,
        Err(e) => return Ok(report(&e)),
    };

    let client = RegistryClient::new(config).context("failed to build registry client")?;
    match client.cosign_referrers(&subject).await {
        Ok(referrers) => {
            debug!(count = referrers.len(), "resolved cosign referrers");
            println!("{}", serde_json::to_string_pretty(&referrers)?);
            Ok(EXIT_SUCCESS)
        }
        Err(e) => Ok(report(&e)),
    }
}

fn cmd_plugin_result(args: PluginResultArgs) -> anyhow::Result<i32> {
    let bytes = match args.input {
        Some(path) if path.as_os_str() != "-" => std::fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let result = match decode_verifier_result(&bytes) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {} [code {}]", e, e.code());
            return Ok(e.code().code() as i32);
        }
    };

    write_verifier_result(&result, std::io::stdout().lock())?;
    println!();

    if result.is_success {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_VERIFICATION_FAILED)
    }
}

fn report(err: &RegistryError) -> i32 {
    eprintln!("error: {}", err);
    err.exit_code()
}
