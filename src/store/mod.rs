//! Client-side data stores backing the marketplace.
//!
//! Two stores own all persistent state: [`IdentityStore`] holds the
//! account roster and the current session, [`RouteStore`] holds the
//! posted routes. Both load their roster from the key-value layer on
//! open and persist every mutation before reporting success, so a
//! restart always reflects the newest state.

mod identity;
mod kv;
mod routes;

pub use identity::IdentityStore;
pub use kv::{FileKv, KeyValue, KvError};
#[cfg(test)]
pub use kv::MemoryKv;
pub use routes::RouteStore;

use uuid::Uuid;

/// Errors reported by the stores.
///
/// All variants are recoverable and local: a failed operation leaves the
/// store's in-memory and persisted state unchanged. Messages are written
/// for the person running the command and are printed as-is.
#[derive(Debug)]
pub enum StoreError {
    /// No account matches the given email.
    NotFound(String),
    /// An account with the same email already exists.
    Conflict(String),
    /// The caller's session is missing, not a driver, or not verified.
    Unauthorized(String),
    /// A required field is missing or empty.
    Validation(String),
    /// A store record could not be encoded.
    Serde(serde_json::Error),
    /// The key-value layer failed.
    Kv(KvError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(msg)
            | StoreError::Conflict(msg)
            | StoreError::Unauthorized(msg)
            | StoreError::Validation(msg) => write!(f, "{}", msg),
            StoreError::Serde(e) => write!(f, "Failed to encode store record: {}", e),
            StoreError::Kv(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Serde(e) => Some(e),
            StoreError::Kv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<KvError> for StoreError {
    fn from(e: KvError) -> Self {
        StoreError::Kv(e)
    }
}

/// Encodes a store record for persistence.
pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(StoreError::Serde)
}

/// Generates a unique opaque id. Only uniqueness is contractual; the
/// prefix exists to make records greppable.
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4())
}
