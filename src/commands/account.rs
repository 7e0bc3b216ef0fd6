use clap::{Args, Subcommand};

use crate::models::{AccountDraft, ProfileDraft, Role};
use crate::store::{IdentityStore, KeyValue};

use super::OutputFormat;

#[derive(Args)]
pub struct AccountCommand {
    #[command(subcommand)]
    pub command: AccountSubcommand,
}

#[derive(Subcommand)]
pub enum AccountSubcommand {
    /// Create a new account and log in
    Signup {
        /// Display name
        #[arg(long)]
        name: String,

        /// Email address (must be unique)
        #[arg(long)]
        email: String,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Account role: driver or customer
        #[arg(long, default_value = "customer")]
        role: String,

        /// Password (accepted, never stored or checked)
        #[arg(long)]
        password: Option<String>,

        /// Vehicle type (drivers)
        #[arg(long)]
        vehicle_type: Option<String>,

        /// License plate number (drivers)
        #[arg(long)]
        plate_number: Option<String>,

        /// Years of driving experience (drivers)
        #[arg(long, default_value_t = 0)]
        experience_years: u32,

        /// Lifetime kilometers driven (drivers)
        #[arg(long, default_value_t = 0)]
        total_kilometers: u64,

        /// Spoken language (drivers, can be repeated)
        #[arg(long = "language", value_name = "LANGUAGE")]
        languages: Vec<String>,

        /// Company name (customers)
        #[arg(long)]
        company: Option<String>,
    },

    /// Log in with an existing email
    Login {
        /// Email address
        email: String,

        /// Password (accepted, never checked)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log out of the current session
    Logout,

    /// Show the currently logged-in account
    Whoami {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List all registered accounts
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl AccountCommand {
    pub fn run<K: KeyValue>(
        &self,
        store: &mut IdentityStore<K>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            AccountSubcommand::Signup {
                name,
                email,
                phone,
                role,
                password,
                vehicle_type,
                plate_number,
                experience_years,
                total_kilometers,
                languages,
                company,
            } => {
                if name.trim().is_empty() {
                    return Err("Name cannot be empty".into());
                }
                if email.trim().is_empty() {
                    return Err("Email cannot be empty".into());
                }
                if phone.trim().is_empty() {
                    return Err("Phone cannot be empty".into());
                }

                let role: Role = role.parse()?;

                let profile = match role {
                    Role::Driver => {
                        let vehicle_type = vehicle_type
                            .clone()
                            .ok_or("Drivers must provide --vehicle-type")?;
                        let plate_number = plate_number
                            .clone()
                            .ok_or("Drivers must provide --plate-number")?;

                        let languages = if languages.is_empty() {
                            vec!["English".to_string()]
                        } else {
                            languages.clone()
                        };

                        ProfileDraft::Driver {
                            vehicle_type,
                            plate_number,
                            experience_years: *experience_years,
                            total_kilometers: *total_kilometers,
                            languages,
                            driver_photo: None,
                            truck_image: None,
                        }
                    }
                    Role::Customer => ProfileDraft::Customer {
                        company_name: company.clone(),
                    },
                };

                let draft = AccountDraft {
                    name: name.trim().to_string(),
                    email: email.trim().to_string(),
                    phone: phone.trim().to_string(),
                    profile,
                };

                let account = store.signup(draft, password.as_deref().unwrap_or(""))?;

                println!("Account created successfully!");
                println!();
                println!("{}", account);

                if account.is_driver() && !account.is_verified_driver() {
                    println!(
                        "Driver verification is pending; routes can be posted once the account is verified."
                    );
                }
                Ok(())
            }

            AccountSubcommand::Login { email, password } => {
                let account = store.login(email, password.as_deref().unwrap_or(""))?;
                println!("Welcome back, {}!", account.name);
                Ok(())
            }

            AccountSubcommand::Logout => {
                if !store.is_authenticated() {
                    println!("Not logged in");
                    return Ok(());
                }
                store.logout()?;
                println!("You have been logged out");
                Ok(())
            }

            AccountSubcommand::Whoami { format } => {
                match store.current_user() {
                    Some(account) => match format {
                        OutputFormat::Json => {
                            println!("{}", serde_json::to_string_pretty(account)?);
                        }
                        OutputFormat::Text => {
                            println!("{}", account);
                        }
                    },
                    None => println!("Not logged in"),
                }
                Ok(())
            }

            AccountSubcommand::List { format } => {
                let accounts = store.accounts();

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(accounts)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<42}  {:<28}  {:<8}  NAME", "ID", "EMAIL", "ROLE");
                        println!("{}", "-".repeat(90));
                        for account in accounts {
                            println!(
                                "{:<42}  {:<28}  {:<8}  {}",
                                account.id,
                                account.email,
                                account.role(),
                                account.name
                            );
                        }
                        println!("\nTotal: {} account(s)", accounts.len());
                    }
                }
                Ok(())
            }
        }
    }
}
