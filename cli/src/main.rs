use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;
mod config;

use commands::contract;

#[derive(Parser)]
#[command(
    name = "helix",
    version,
    about = "Helix - smart contract interaction workbench",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, env = "HELIX_CONFIG")]
    config: Option<PathBuf>,

    /// RPC endpoint
    #[arg(short, long, global = true, env = "HELIX_RPC")]
    rpc: Option<String>,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Contract browsing, invocation, and deployment
    #[command(subcommand)]
    Contract(contract::ContractCommands),

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .init();

    let config = config::Config::load(cli.config.as_deref(), cli.rpc.as_deref())?;

    match cli.command {
        Commands::Contract(cmd) => contract::execute(cmd, &config).await?,
        Commands::Init { force } => {
            config::Config::init(force)?;
            println!("{}", "✓ Configuration initialized successfully".green());
        }
    }

    Ok(())
}
