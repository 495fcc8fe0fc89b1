// # cfddns - Cloudflare DDNS client
//
// Thin integration layer: parse the command line, read the environment,
// set up logging, wire the HTTP IP source and the Cloudflare provider into
// the core, and turn the result into output and an exit code. All update
// logic lives in cfddns-core.
//
// ## Environment
//
// - `CLOUDFLARE_API_TOKEN`: API token when `--token` is not given
// - `CFDDNS_LOG_LEVEL`: trace, debug, info, warn (default) or error
//
// ## Example
//
// ```bash
// export CLOUDFLARE_API_TOKEN=your_token
// cfddns home.example.com
// ```

mod cli;

use anyhow::Result;
use async_trait::async_trait;
use cfddns_core::{
    DnsProvider, Error, IpSource, Outcome, RunArgs, RunConfig, TOKEN_ENV_VAR, UpdateEngine,
};
use cfddns_ip_http::HttpIpSource;
use cfddns_provider_cloudflare::CloudflareProvider;
use cfddns_release_github::GithubReleases;
use clap::Parser;
use cli::Cli;
use std::env;
use std::net::Ipv4Addr;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Environment variable selecting the log level
const LOG_LEVEL_ENV_VAR: &str = "CFDDNS_LOG_LEVEL";

/// Where `--upgrade` looks for releases
const RELEASE_OWNER: &str = "derekn";
const RELEASE_REPO: &str = "cfddns";

/// Exit codes for the different ways a run can end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CfddnsExitCode {
    /// Record updated, already current, or upgrade handled
    Success = 0,
    /// Lookup, update or upgrade failure
    OperationalError = 1,
    /// Invalid arguments or configuration
    ValidationError = 2,
}

impl From<CfddnsExitCode> for ExitCode {
    fn from(code: CfddnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// A failed run, tagged with the stage that failed
#[derive(Debug)]
enum Failure {
    Validation(Error),
    Operational(Error),
}

impl Failure {
    fn exit_code(&self) -> CfddnsExitCode {
        match self {
            Self::Validation(_) => CfddnsExitCode::ValidationError,
            Self::Operational(_) => CfddnsExitCode::OperationalError,
        }
    }

    fn error(&self) -> &Error {
        match self {
            Self::Validation(e) | Self::Operational(e) => e,
        }
    }
}

fn exit_code<T>(result: &std::result::Result<T, Failure>) -> CfddnsExitCode {
    match result {
        Ok(_) => CfddnsExitCode::Success,
        Err(failure) => failure.exit_code(),
    }
}

/// Public address lookup over the default HTTP services
///
/// The client is only built when discovery is needed, so an `--ip`
/// override never touches it.
struct DefaultIpSource;

#[async_trait]
impl IpSource for DefaultIpSource {
    async fn discover(&self) -> cfddns_core::Result<Ipv4Addr> {
        HttpIpSource::new()?.discover().await
    }
}

fn cloudflare(config: &RunConfig) -> cfddns_core::Result<Box<dyn DnsProvider>> {
    Ok(Box::new(CloudflareProvider::new(config.token())?))
}

fn parse_log_level(value: &str) -> Result<Level> {
    match value.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "{LOG_LEVEL_ENV_VAR} '{value}' is not valid. \
            Valid levels: trace, debug, info, warn, error"
        ),
    }
}

/// Install a stderr subscriber so stdout stays reserved for results
fn init_tracing() -> Result<()> {
    let level = match env::var(LOG_LEVEL_ENV_VAR) {
        Ok(value) => parse_log_level(&value)?,
        Err(_) => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("Error: {e}");
        return CfddnsExitCode::ValidationError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to create runtime: {e}");
            return CfddnsExitCode::OperationalError.into();
        }
    };

    let result = if cli.upgrade {
        rt.block_on(upgrade())
    } else {
        rt.block_on(update(
            cli.run_args(),
            env::var(TOKEN_ENV_VAR).ok(),
            &DefaultIpSource,
            cloudflare,
        ))
        .map(|outcome| report(&outcome, cli.verbose))
    };

    if let Err(failure) = &result {
        eprintln!("Error: {}", failure.error());
    }
    exit_code(&result).into()
}

/// Validate arguments, then bring the record in line
///
/// Anything that fails while validating is a [`Failure::Validation`];
/// the provider is built from the validated configuration and everything
/// from there on is a [`Failure::Operational`].
async fn update<F>(
    args: RunArgs,
    env_token: Option<String>,
    ip_source: &dyn IpSource,
    make_provider: F,
) -> std::result::Result<Outcome, Failure>
where
    F: FnOnce(&RunConfig) -> cfddns_core::Result<Box<dyn DnsProvider>>,
{
    let config = args
        .validate(env_token, ip_source)
        .await
        .map_err(Failure::Validation)?;
    tracing::info!("Resolved configuration: {:?}", config);

    let provider = make_provider(&config).map_err(Failure::Operational)?;
    let engine = UpdateEngine::new(provider);
    engine.run(&config).await.map_err(Failure::Operational)
}

fn report(outcome: &Outcome, verbose: bool) {
    println!("{outcome}");
    if verbose {
        match outcome.detail() {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::warn!("Failed to render record: {}", e),
        }
    }
}

/// Replace the running executable with the latest release, if newer
async fn upgrade() -> std::result::Result<(), Failure> {
    let source = GithubReleases::new(RELEASE_OWNER, RELEASE_REPO, env!("CARGO_PKG_NAME"))
        .map_err(Failure::Operational)?;

    let outcome = cfddns_core::self_upgrade(env!("CARGO_PKG_VERSION"), &source)
        .await
        .map_err(Failure::Operational)?;

    if let cfddns_core::UpgradeOutcome::Upgraded { path, .. } = &outcome {
        println!("{}", path.display());
    }
    println!("{outcome}");
    Ok(())
}
