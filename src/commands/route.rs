use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::models::{Route, RouteDraft};
use crate::store::{IdentityStore, KeyValue, RouteStore};

use super::OutputFormat;

#[derive(Args)]
pub struct RouteCommand {
    #[command(subcommand)]
    pub command: RouteSubcommand,
}

#[derive(Subcommand)]
pub enum RouteSubcommand {
    /// Post a new return-trip route (verified drivers only)
    Post {
        /// Starting city
        origin: String,

        /// Destination city
        destination: String,

        /// Travel date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Available capacity, free text (e.g. "20 tons")
        #[arg(long)]
        capacity: String,

        /// Vehicle type (defaults to your registered vehicle)
        #[arg(long)]
        vehicle_type: Option<String>,
    },

    /// List posted routes
    List {
        /// Only routes posted by this driver id
        #[arg(long)]
        driver: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Search routes by origin and destination
    Search {
        /// Origin filter (substring, case-insensitive)
        #[arg(long, default_value = "")]
        origin: String,

        /// Destination filter (substring, case-insensitive)
        #[arg(long, default_value = "")]
        destination: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl RouteCommand {
    pub fn run<K: KeyValue>(
        &self,
        routes: &mut RouteStore<K>,
        identity: &IdentityStore<K>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RouteSubcommand::Post {
                origin,
                destination,
                date,
                capacity,
                vehicle_type,
            } => {
                if origin.trim().is_empty()
                    || destination.trim().is_empty()
                    || capacity.trim().is_empty()
                {
                    return Err("Origin, destination and capacity are all required".into());
                }

                let date: NaiveDate = date
                    .parse()
                    .map_err(|_| format!("Invalid date '{}'. Expected YYYY-MM-DD", date))?;

                let session = identity.current_user();

                // Default to the driver's registered vehicle
                let vehicle_type = match vehicle_type {
                    Some(v) => v.clone(),
                    None => session
                        .and_then(|a| a.driver_profile())
                        .map(|p| p.vehicle_type.clone())
                        .ok_or("A vehicle type is required (--vehicle-type)")?,
                };

                let draft = RouteDraft {
                    origin: origin.trim().to_string(),
                    destination: destination.trim().to_string(),
                    date,
                    capacity: capacity.trim().to_string(),
                    vehicle_type,
                };

                let route = routes.add_route(draft, session)?;

                println!("Route posted successfully!");
                println!();
                println!("{}", route);
                Ok(())
            }

            RouteSubcommand::List { driver, format } => {
                let listed: Vec<&Route> = match driver {
                    Some(driver_id) => routes.routes_by_driver(driver_id),
                    None => routes.routes().iter().collect(),
                };

                print_routes(&listed, format)
            }

            RouteSubcommand::Search {
                origin,
                destination,
                format,
            } => {
                let hits = routes.search(origin, destination);
                print_routes(&hits, format)
            }
        }
    }
}

fn print_routes(routes: &[&Route], format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    if routes.is_empty() {
        println!("No routes found");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(routes)?);
        }
        OutputFormat::Text => {
            println!(
                "{:<44}  {:<16}  {:<16}  {:<12}  CAPACITY",
                "ID", "ORIGIN", "DESTINATION", "DATE"
            );
            println!("{}", "-".repeat(104));
            for route in routes {
                println!(
                    "{:<44}  {:<16}  {:<16}  {:<12}  {}",
                    route.id, route.origin, route.destination, route.date, route.capacity
                );
            }
            println!("\nTotal: {} route(s)", routes.len());
        }
    }
    Ok(())
}
