use std::{net::SocketAddr, time::Duration};

use clap::{builder::NonEmptyStringValueParser, Parser};
use claim_assembler_client::{Config, Url};

/// Process configuration, read once at startup from the arguments or the environment.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the bridge service.
    #[arg(long, env = "BASE_URL", value_name = "URL", value_parser = parse_base_url)]
    pub base_url: Url,

    /// Identifier of the bridge contract whose deposits are claimed.
    #[arg(
        long,
        env = "BRIDGE_CONTRACT_ID",
        value_name = "ID",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub bridge: String,

    /// Bind to the provided socket
    #[arg(short, long, env = "BIND", value_name = "SOCKET", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Timeout of each upstream call, in milliseconds.
    #[arg(
        short,
        long,
        env = "UPSTREAM_TIMEOUT_MS",
        value_name = "MILLIS",
        default_value_t = 10_000
    )]
    pub timeout: u64,
}

impl Cli {
    /// Returns the bridge client configuration.
    pub fn config(&self) -> Config {
        Config::new(self.base_url.clone(), &self.bridge)
            .with_timeout(Duration::from_millis(self.timeout))
    }
}

fn parse_base_url(url: &str) -> Result<Url, String> {
    let url = Url::parse(url).map_err(|e| format!("invalid base url `{url}`: {e}"))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        s => Err(format!("unsupported base url scheme `{s}`")),
    }
}
