use clap::Parser;
use ibkr_bridge::cli::{self, Cli};
use ibkr_bridge::setup_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();

    let cli = Cli::parse();
    let _telemetry_guard = setup_tracing(&cli.env);

    cli::run(cli).await
}
