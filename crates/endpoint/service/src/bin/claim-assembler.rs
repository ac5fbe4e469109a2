use clap::Parser as _;
use claim_assembler_client::Client;
use claim_assembler_service::Cli;
use poem::listener::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let config = cli.config();

    tracing::info!(
        "bridge service set to `{}` for contract `{}`...",
        config.base_url,
        config.bridge
    );

    let client = Client::new(config)?;
    let app = claim_assembler_service::app(client, &format!("http://{}", &cli.bind));

    tracing::info!("API loaded, listening on `{}`...", &cli.bind);

    poem::Server::new(TcpListener::bind(cli.bind)).run(app).await?;

    Ok(())
}
