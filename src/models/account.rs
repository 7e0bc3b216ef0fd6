use serde::{Deserialize, Serialize};
use std::fmt;

use super::role::Role;

/// Driver-specific profile data.
///
/// A driver starts unverified; the `loadloop-admin` tool flips the flag
/// once the operator has checked the driver's documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    pub vehicle_type: String,
    pub plate_number: String,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub total_kilometers: u64,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truck_image: Option<String>,
}

/// Customer-specific profile data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// Role-specific payload. The `role` tag is stored inline in the account
/// record, so a serialized account reads as one flat JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    Driver(DriverProfile),
    Customer(CustomerProfile),
}

/// A registered marketplace participant.
///
/// The role is fixed at creation; there is no way to change an account
/// from customer to driver or back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(flatten)]
    pub profile: Profile,
}

impl Account {
    pub fn role(&self) -> Role {
        match self.profile {
            Profile::Driver(_) => Role::Driver,
            Profile::Customer(_) => Role::Customer,
        }
    }

    pub fn is_driver(&self) -> bool {
        self.role() == Role::Driver
    }

    pub fn driver_profile(&self) -> Option<&DriverProfile> {
        match &self.profile {
            Profile::Driver(profile) => Some(profile),
            Profile::Customer(_) => None,
        }
    }

    /// True for drivers whose documents have been checked. Customers are
    /// never verified.
    pub fn is_verified_driver(&self) -> bool {
        self.driver_profile().is_some_and(|p| p.verified)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "Email: {}", self.email)?;
        writeln!(f, "Phone: {}", self.phone)?;
        writeln!(f, "Role: {}", self.role())?;

        match &self.profile {
            Profile::Driver(profile) => {
                writeln!(
                    f,
                    "Vehicle: {} ({})",
                    profile.vehicle_type, profile.plate_number
                )?;
                writeln!(
                    f,
                    "Experience: {} year(s), {} km driven",
                    profile.experience_years, profile.total_kilometers
                )?;
                if !profile.languages.is_empty() {
                    writeln!(f, "Languages: {}", profile.languages.join(", "))?;
                }
                writeln!(
                    f,
                    "Verified: {}",
                    if profile.verified { "yes" } else { "no" }
                )?;
            }
            Profile::Customer(profile) => {
                if let Some(company) = &profile.company_name {
                    writeln!(f, "Company: {}", company)?;
                }
            }
        }

        Ok(())
    }
}

/// Signup input: the account fields a new user supplies. The id is
/// assigned by the identity store.
#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub profile: ProfileDraft,
}

/// Role payload for a signup draft.
///
/// Driver drafts carry no `verified` field at all; every new driver
/// starts unverified.
#[derive(Debug, Clone)]
pub enum ProfileDraft {
    Driver {
        vehicle_type: String,
        plate_number: String,
        experience_years: u32,
        total_kilometers: u64,
        languages: Vec<String>,
        driver_photo: Option<String>,
        truck_image: Option<String>,
    },
    Customer {
        company_name: Option<String>,
    },
}

impl ProfileDraft {
    pub fn into_profile(self) -> Profile {
        match self {
            ProfileDraft::Driver {
                vehicle_type,
                plate_number,
                experience_years,
                total_kilometers,
                languages,
                driver_photo,
                truck_image,
            } => Profile::Driver(DriverProfile {
                vehicle_type,
                plate_number,
                experience_years,
                total_kilometers,
                languages,
                verified: false,
                driver_photo,
                truck_image,
            }),
            ProfileDraft::Customer { company_name } => {
                Profile::Customer(CustomerProfile { company_name })
            }
        }
    }
}
