//! Quotes CLI - Main Entry Point

use clap::{Parser, Subcommand};

use quotes_cli::client::QuotesClient;
use quotes_cli::commands::quote;
use quotes_cli::output::{self, print_error, print_success};

/// Quotes CLI - manage quotes on a running Quotes server
#[derive(Parser)]
#[command(name = "quotes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Server address
    #[arg(long, env = "QUOTES_SERVER", default_value = "http://127.0.0.1:1234", global = true)]
    server: String,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Quote(quote::QuoteCommands),

    /// Check server status
    Status,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let client = QuotesClient::new(&cli.server)?;
    tracing::debug!("Using server {}", client.base_url());

    match cli.command {
        Commands::Quote(cmd) => {
            if let Err(e) = quote::execute(cmd, &client, cli.format).await {
                print_error(&e.to_string());
                std::process::exit(1);
            }
        }
        Commands::Status => {
            if client.health_check().await {
                print_success(&format!("Server is running at {}", cli.server));
            } else {
                print_error(&format!("Server is not responding at {}", cli.server));
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("Quotes CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("quotes-common v{}", quotes_common::VERSION);
        }
    }

    Ok(())
}
