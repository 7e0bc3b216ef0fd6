mod account;
mod role;
mod route;

pub use account::{Account, AccountDraft, CustomerProfile, DriverProfile, Profile, ProfileDraft};
pub use role::Role;
pub use route::{Route, RouteDraft};
