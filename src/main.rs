use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authgate::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authgate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => cli::commands::init(config, force).await,
        Commands::Serve { host, port } => cli::commands::serve(config, host, port).await,
        Commands::HashPassword { password, cost } => cli::commands::hash(&password, cost).await,
        Commands::InspectToken { token, format } => {
            cli::commands::inspect_token(config, &token, format).await
        }
    }
}
