//! LoadLoop Admin CLI
//!
//! Maintenance tool for the local marketplace data. Driver verification
//! lives here, outside the application itself: the `loadloop` CLI never
//! changes a verified flag.
//!
//! # Usage
//!
//! ```bash
//! loadloop-admin driver list
//! loadloop-admin driver verify john@example.com
//! loadloop-admin driver revoke john@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `LOADLOOP_DATA_DIR`: Directory where loadloop stores data (default: ~/.local/share/loadloop)

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "loadloop-admin")]
#[command(version)]
#[command(about = "LoadLoop marketplace administration tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage drivers
    Driver(DriverCommand),
}

#[derive(Args)]
struct DriverCommand {
    #[command(subcommand)]
    command: DriverSubcommand,
}

#[derive(Subcommand)]
enum DriverSubcommand {
    /// List all drivers and their verification status
    List,
    /// Mark a driver as verified
    Verify {
        /// Driver's email address
        email: String,
    },
    /// Withdraw a driver's verification
    Revoke {
        /// Driver's email address
        email: String,
    },
}

// ============================================================================
// Storage
// ============================================================================

/// Get the data directory for the marketplace
fn data_dir() -> PathBuf {
    std::env::var("LOADLOOP_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("loadloop")
        })
}

/// Path to the persisted account roster
fn users_path() -> PathBuf {
    data_dir().join("loadloop-users.json")
}

/// Load the account roster as raw JSON records
fn load_accounts() -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let path = users_path();

    if !path.exists() {
        return Err(format!(
            "No account data found at {} (run `loadloop` once to create it)",
            path.display()
        )
        .into());
    }

    let contents = std::fs::read_to_string(&path)?;
    let accounts: Vec<Value> = serde_json::from_str(&contents)?;
    Ok(accounts)
}

/// Save the account roster
fn save_accounts(accounts: &[Value]) -> Result<(), Box<dyn std::error::Error>> {
    let path = users_path();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = serde_json::to_string(accounts)?;
    std::fs::write(&path, contents)?;
    Ok(())
}

fn is_driver(account: &Value) -> bool {
    account["role"].as_str() == Some("driver")
}

fn email_matches(account: &Value, email: &str) -> bool {
    account["email"]
        .as_str()
        .is_some_and(|e| e.eq_ignore_ascii_case(email))
}

// ============================================================================
// Commands
// ============================================================================

fn list_drivers() -> Result<(), Box<dyn std::error::Error>> {
    let accounts = load_accounts()?;

    let drivers: Vec<&Value> = accounts.iter().filter(|a| is_driver(a)).collect();

    if drivers.is_empty() {
        println!("No drivers registered.");
        return Ok(());
    }

    println!("{:<30} {:<20} {:<18} {:<10}", "EMAIL", "NAME", "VEHICLE", "STATUS");
    println!("{}", "-".repeat(80));

    for driver in &drivers {
        let email = driver["email"].as_str().unwrap_or_default();
        let name = driver["name"].as_str().unwrap_or_default();
        let vehicle = driver["vehicleType"].as_str().unwrap_or_default();
        let status = if driver["verified"].as_bool().unwrap_or(false) {
            "verified"
        } else {
            "pending"
        };

        println!("{:<30} {:<20} {:<18} {:<10}", email, name, vehicle, status);
    }

    println!();
    println!("Total: {} driver(s)", drivers.len());

    Ok(())
}

fn set_verified(email: &str, verified: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut accounts = load_accounts()?;

    let driver = accounts
        .iter_mut()
        .find(|a| is_driver(a) && email_matches(a, email));

    let driver = match driver {
        Some(d) => d,
        None => {
            eprintln!("Error: No driver registered for '{}'", email);
            std::process::exit(1);
        }
    };

    driver["verified"] = Value::Bool(verified);
    save_accounts(&accounts)?;

    if verified {
        println!("Verified driver: {}", email);
    } else {
        println!("Revoked verification for: {}", email);
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Driver(driver_cmd) => match driver_cmd.command {
            DriverSubcommand::List => list_drivers(),
            DriverSubcommand::Verify { email } => set_verified(&email, true),
            DriverSubcommand::Revoke { email } => set_verified(&email, false),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
