mod run;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dropintel")]
#[command(about = "Dropi catalog scraping and market-intelligence pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in to the portal, extract products, and build dossiers.
    Run(run::RunArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Credentials are validated here, before any I/O; a missing pair is
    // the only error that fails the process.
    let config = dropintel_core::load_app_config()?;
    init_tracing(&config.log_level);

    match cli.command {
        Commands::Run(args) => run::execute(config, &args).await,
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
