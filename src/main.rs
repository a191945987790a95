use anyhow::Result;
use clap::Parser;
use tokio::signal;

use chatvec::cli::commands::{
    handle_config, handle_embed, handle_query, handle_status, handle_upsert,
};
use chatvec::cli::{Cli, Commands};
use chatvec::models::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();
    chatvec::logging::init(&config.logging)?;

    let format = cli.format.unwrap_or(config.search.default_format);
    let verbose = cli.verbose;

    tokio::select! {
        result = run_command(cli.command, format, verbose) => {
            result?;
        }
        _ = shutdown_signal() => {
            eprintln!("\nReceived shutdown signal, cleaning up...");
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        }
    }

    Ok(())
}

async fn run_command(
    command: Commands,
    format: chatvec::models::OutputFormat,
    verbose: bool,
) -> Result<()> {
    match command {
        Commands::Embed(args) => {
            handle_embed(args, format, verbose).await?;
        }
        Commands::Upsert(args) => {
            handle_upsert(args, format, verbose).await?;
        }
        Commands::Query(args) => {
            handle_query(args, format, verbose).await?;
        }
        Commands::Status(args) => {
            handle_status(args, format, verbose).await?;
        }
        Commands::Config(cmd) => {
            handle_config(cmd, format, verbose).await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
