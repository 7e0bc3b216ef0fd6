use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Driver,
    Customer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Driver => write!(f, "driver"),
            Role::Customer => write!(f, "customer"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "driver" => Ok(Role::Driver),
            "customer" => Ok(Role::Customer),
            _ => Err(format!(
                "Invalid role '{}'. Valid options: driver, customer",
                s
            )),
        }
    }
}
