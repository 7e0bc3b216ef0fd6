use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod models;
mod store;

use commands::{AccountCommand, ConfigCommand, DriverCommand, RouteCommand};
use config::Config;
use store::{FileKv, IdentityStore, RouteStore};

#[derive(Parser)]
#[command(name = "loadloop")]
#[command(version)]
#[command(about = "A return-trip freight marketplace for drivers and customers", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage your account and session
    Account(AccountCommand),

    /// Post and search return-trip routes
    Route(RouteCommand),

    /// Browse registered drivers
    Driver(DriverCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;
    let data_dir = config.data_dir.value.clone();

    match cli.command {
        Some(Commands::Account(cmd)) => {
            let mut identity = IdentityStore::open(FileKv::new(&data_dir))?;
            cmd.run(&mut identity)?;
        }
        Some(Commands::Route(cmd)) => {
            let identity = IdentityStore::open(FileKv::new(&data_dir))?;
            let mut routes = RouteStore::open(FileKv::new(&data_dir))?;
            cmd.run(&mut routes, &identity)?;
        }
        Some(Commands::Driver(cmd)) => {
            let identity = IdentityStore::open(FileKv::new(&data_dir))?;
            let routes = RouteStore::open(FileKv::new(&data_dir))?;
            cmd.run(&identity, &routes)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
