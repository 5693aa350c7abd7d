use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "trolley")]
#[command(about = "Smart trolley checkout service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the checkout service
    Serve {
        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Override the configured listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Render a receipt PDF for the configured catalog, without a server
    Receipt {
        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Where to write the PDF
        #[arg(short, long)]
        output: String,

        /// Payment method to print on the receipt (UPI, Card, NetBanking)
        #[arg(short, long, default_value = "UPI")]
        method: String,
    },

    /// Parse, validate and echo the effective configuration
    ShowConfig {
        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    // Priority: RUST_LOG env var > verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match cli.verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { config, port } => {
            commands::serve::run(config.as_deref(), port).await?;
        }
        Commands::Receipt {
            config,
            output,
            method,
        } => {
            commands::receipt::run(config.as_deref(), &output, &method).await?;
        }
        Commands::ShowConfig { config } => {
            commands::show_config::run(config.as_deref()).await?;
        }
    }

    Ok(())
}
