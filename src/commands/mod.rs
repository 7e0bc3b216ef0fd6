mod account;
mod config_cmd;
mod driver;
mod route;

pub use account::AccountCommand;
pub use config_cmd::ConfigCommand;
pub use driver::DriverCommand;
pub use route::RouteCommand;

use clap::ValueEnum;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
