use clap::{Args, Subcommand};

use crate::store::{IdentityStore, KeyValue, RouteStore};

use super::OutputFormat;

#[derive(Args)]
pub struct DriverCommand {
    #[command(subcommand)]
    pub command: DriverSubcommand,
}

#[derive(Subcommand)]
pub enum DriverSubcommand {
    /// List registered drivers
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a driver's profile and posted routes
    Show {
        /// Driver id or email
        identifier: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl DriverCommand {
    pub fn run<K: KeyValue>(
        &self,
        identity: &IdentityStore<K>,
        routes: &RouteStore<K>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DriverSubcommand::List { format } => {
                let drivers = identity.drivers();

                if drivers.is_empty() {
                    println!("No drivers registered");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&drivers)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<42}  {:<20}  {:<16}  STATUS",
                            "ID", "NAME", "VEHICLE"
                        );
                        println!("{}", "-".repeat(92));
                        for account in &drivers {
                            if let Some(profile) = account.driver_profile() {
                                println!(
                                    "{:<42}  {:<20}  {:<16}  {}",
                                    account.id,
                                    account.name,
                                    profile.vehicle_type,
                                    if profile.verified { "verified" } else { "pending" }
                                );
                            }
                        }
                        println!("\nTotal: {} driver(s)", drivers.len());
                    }
                }
                Ok(())
            }

            DriverSubcommand::Show { identifier, format } => {
                let driver = identity
                    .drivers()
                    .into_iter()
                    .find(|a| a.id == *identifier || a.email.eq_ignore_ascii_case(identifier))
                    .ok_or_else(|| format!("Driver not found: {}", identifier))?;

                let posted = routes.routes_by_driver(&driver.id);

                match format {
                    OutputFormat::Json => {
                        let combined = serde_json::json!({
                            "driver": driver,
                            "routes": posted,
                        });
                        println!("{}", serde_json::to_string_pretty(&combined)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", driver);

                        if posted.is_empty() {
                            println!("No routes posted yet");
                        } else {
                            println!("Posted routes:");
                            for route in &posted {
                                println!(
                                    "  {} -> {} on {} ({})",
                                    route.origin, route.destination, route.date, route.capacity
                                );
                            }
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
