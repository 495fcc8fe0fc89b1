//! Command-line surface

use cfddns_core::RunArgs;
use cfddns_release_github::platform;
use clap::Parser;
use std::sync::LazyLock;

/// `v<version> <os>/<arch>`, shown by `-V`
static VERSION: LazyLock<String> = LazyLock::new(|| {
    let (os, arch) = platform();
    format!("v{} {os}/{arch}", env!("CARGO_PKG_VERSION"))
});

/// Version line plus copyright notice, shown by `--version`
static LONG_VERSION: LazyLock<String> = LazyLock::new(|| {
    let year = env!("CARGO_PKG_VERSION").split('.').next().unwrap_or_default();
    format!(
        "{}\nCopyright (C) {year} Derek Nicol. Licensed under GNU GPLv3. Not affiliated with Cloudflare",
        VERSION.as_str()
    )
});

/// Cloudflare DDNS client
///
/// Points <RECORD> at this machine's public IPv4 address, writing only when
/// the address changed.
#[derive(Parser, Debug)]
#[command(
    name = "cfddns",
    version = VERSION.as_str(),
    long_version = LONG_VERSION.as_str(),
    about,
    long_about = None
)]
pub struct Cli {
    /// DNS record to update (e.g., host.example.com)
    pub record: Option<String>,

    /// Cloudflare API token [env: CLOUDFLARE_API_TOKEN]
    #[arg(short, long)]
    pub token: Option<String>,

    /// Zone name (default: the record's registrable domain)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// IP address (default: automatically resolved)
    #[arg(long)]
    pub ip: Option<String>,

    /// Force update (required only for the root domain)
    #[arg(short, long)]
    pub force: bool,

    /// Print the resulting record as JSON
    #[arg(short, long)]
    pub verbose: bool,

    /// Upgrade cfddns to the latest release and exit
    #[arg(long, conflicts_with_all = ["record", "token", "domain", "ip", "force"])]
    pub upgrade: bool,
}

impl Cli {
    /// The update arguments, still unvalidated
    pub fn run_args(&self) -> RunArgs {
        RunArgs {
            record: self.record.clone(),
            token: self.token.clone(),
            domain: self.domain.clone(),
            ip: self.ip.clone(),
            force: self.force,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_short_flags() {
        let cli = Cli::try_parse_from([
            "cfddns", "foo.bar.tld", "-t", "def456", "-d", "test.tld", "-f", "-v",
        ])
        .unwrap();

        let args = cli.run_args();
        assert_eq!(args.record.as_deref(), Some("foo.bar.tld"));
        assert_eq!(args.token.as_deref(), Some("def456"));
        assert_eq!(args.domain.as_deref(), Some("test.tld"));
        assert!(args.force);
        assert!(args.verbose);
        assert!(!cli.upgrade);
    }

    #[test]
    fn parses_ip_override() {
        let cli = Cli::try_parse_from(["cfddns", "foo.bar.tld", "--ip", "192.168.0.1"]).unwrap();
        assert_eq!(cli.run_args().ip.as_deref(), Some("192.168.0.1"));
    }

    #[test]
    fn record_is_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["cfddns"]).unwrap();
        assert!(cli.record.is_none());
    }

    #[test]
    fn version_banner() {
        let (os, arch) = platform();
        let short = Cli::command().render_version();
        assert_eq!(short.trim_end(), format!("cfddns v{} {os}/{arch}", env!("CARGO_PKG_VERSION")));

        let long = Cli::command().render_long_version();
        let mut lines = long.lines();
        assert_eq!(lines.next(), short.lines().next());
        let notice = lines.next().unwrap();
        assert!(notice.starts_with("Copyright (C) 2025 Derek Nicol."));
        assert!(notice.contains("GNU GPLv3"));
    }

    #[test]
    fn upgrade_stands_alone() {
        assert!(Cli::try_parse_from(["cfddns", "--upgrade"]).unwrap().upgrade);
        assert!(Cli::try_parse_from(["cfddns", "--upgrade", "foo.bar.tld"]).is_err());
    }
}
