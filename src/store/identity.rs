//! Account roster and session management.
//!
//! The roster is persisted under `loadloop-users`, the current session
//! under `loadloop-current-user`. A fresh store seeds the roster with
//! two built-in accounts (one verified driver, one customer) so the
//! marketplace is browsable on first run.
//!
//! There is no credential store: passwords are accepted and discarded,
//! and login succeeds for any existing email. Real authentication is an
//! explicit non-goal of the local marketplace.

use crate::models::{Account, AccountDraft, CustomerProfile, DriverProfile, Profile, Role};

use super::kv::KeyValue;
use super::{encode, new_id, StoreError};

/// Key for the persisted account roster.
pub const USERS_KEY: &str = "loadloop-users";
/// Key for the persisted session.
pub const SESSION_KEY: &str = "loadloop-current-user";

/// Owns the account roster and the single current session.
#[derive(Debug)]
pub struct IdentityStore<K: KeyValue> {
    kv: K,
    accounts: Vec<Account>,
    session: Option<Account>,
}

impl<K: KeyValue> IdentityStore<K> {
    /// Opens the store: loads the roster (seeding it on first use) and
    /// restores any saved session.
    ///
    /// An unreadable roster record falls back to the built-in accounts
    /// in memory without overwriting the stored bytes.
    pub fn open(mut kv: K) -> Result<Self, StoreError> {
        let accounts = match kv.get(USERS_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(accounts) => accounts,
                Err(e) => {
                    tracing::warn!(
                        "Stored account roster is unreadable, using built-in accounts: {}",
                        e
                    );
                    seed_accounts()
                }
            },
            None => {
                let accounts = seed_accounts();
                kv.set(USERS_KEY, &encode(&accounts)?)?;
                accounts
            }
        };

        let session = match kv.get(SESSION_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(account) => Some(account),
                Err(e) => {
                    tracing::warn!("Stored session is unreadable, starting logged out: {}", e);
                    None
                }
            },
            None => None,
        };

        tracing::info!("Loaded {} account(s)", accounts.len());

        Ok(Self {
            kv,
            accounts,
            session,
        })
    }

    /// Logs in as the account registered under `email` (case-insensitive).
    ///
    /// The password is accepted but never checked against stored
    /// material; any password succeeds for an existing email.
    pub fn login(&mut self, email: &str, _password: &str) -> Result<Account, StoreError> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| StoreError::NotFound("Invalid email or password".to_string()))?;

        self.kv.set(SESSION_KEY, &encode(&account)?)?;
        self.session = Some(account.clone());

        tracing::info!("Logged in as {} ({})", account.name, account.email);
        Ok(account)
    }

    /// Registers a new account and logs it in.
    ///
    /// Driver drafts always produce an unverified driver. The password
    /// is discarded (see [`IdentityStore::login`]).
    pub fn signup(&mut self, draft: AccountDraft, _password: &str) -> Result<Account, StoreError> {
        let email = draft.email.trim();
        if email.is_empty() {
            return Err(StoreError::Validation("Email is required".to_string()));
        }

        if self
            .accounts
            .iter()
            .any(|a| a.email.eq_ignore_ascii_case(email))
        {
            return Err(StoreError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let account = Account {
            id: new_id("user"),
            name: draft.name,
            email: email.to_string(),
            phone: draft.phone,
            profile: draft.profile.into_profile(),
        };

        // Persist before committing the new roster in memory
        let mut roster = self.accounts.clone();
        roster.push(account.clone());
        self.kv.set(USERS_KEY, &encode(&roster)?)?;
        self.accounts = roster;

        self.kv.set(SESSION_KEY, &encode(&account)?)?;
        self.session = Some(account.clone());

        tracing::info!("Registered {} as {}", account.email, account.role());
        Ok(account)
    }

    /// Clears the session and removes its persisted record.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.session = None;
        self.kv.remove(SESSION_KEY)?;
        Ok(())
    }

    /// The full roster, in registration order.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// The subset of the roster with role driver, in roster order.
    pub fn drivers(&self) -> Vec<&Account> {
        self.accounts
            .iter()
            .filter(|a| a.role() == Role::Driver)
            .collect()
    }

    /// The currently logged-in account, if any.
    pub fn current_user(&self) -> Option<&Account> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// Built-in accounts present on first run.
fn seed_accounts() -> Vec<Account> {
    vec![
        Account {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: "1234567890".to_string(),
            profile: Profile::Driver(DriverProfile {
                vehicle_type: "Heavy Truck".to_string(),
                plate_number: "TN-01-AB-1234".to_string(),
                experience_years: 5,
                total_kilometers: 50_000,
                languages: vec![
                    "English".to_string(),
                    "Hindi".to_string(),
                    "Tamil".to_string(),
                ],
                verified: true,
                driver_photo: None,
                truck_image: None,
            }),
        },
        Account {
            id: "2".to_string(),
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            phone: "9876543210".to_string(),
            profile: Profile::Customer(CustomerProfile {
                company_name: Some("Smith Logistics".to_string()),
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileDraft;
    use crate::store::{FileKv, MemoryKv};
    use tempfile::TempDir;

    fn setup() -> IdentityStore<MemoryKv> {
        IdentityStore::open(MemoryKv::new()).unwrap()
    }

    fn customer_draft(email: &str) -> AccountDraft {
        AccountDraft {
            name: "Test Customer".to_string(),
            email: email.to_string(),
            phone: "5550001111".to_string(),
            profile: ProfileDraft::Customer { company_name: None },
        }
    }

    fn driver_draft(email: &str) -> AccountDraft {
        AccountDraft {
            name: "Test Driver".to_string(),
            email: email.to_string(),
            phone: "5550002222".to_string(),
            profile: ProfileDraft::Driver {
                vehicle_type: "Mini Truck".to_string(),
                plate_number: "KA-05-XY-9999".to_string(),
                experience_years: 2,
                total_kilometers: 12_000,
                languages: vec!["English".to_string()],
                driver_photo: None,
                truck_image: None,
            },
        }
    }

    #[test]
    fn test_open_seeds_builtin_accounts() {
        let store = setup();

        assert_eq!(store.accounts().len(), 2);
        assert!(!store.is_authenticated());

        let john = &store.accounts()[0];
        assert_eq!(john.email, "john@example.com");
        assert!(john.is_verified_driver());

        let jane = &store.accounts()[1];
        assert_eq!(jane.role(), Role::Customer);
    }

    #[test]
    fn test_seed_is_persisted_on_first_open() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = IdentityStore::open(FileKv::new(temp_dir.path())).unwrap();
            assert_eq!(store.accounts().len(), 2);
        }

        assert!(temp_dir.path().join("loadloop-users.json").exists());
    }

    #[test]
    fn test_login_existing_email() {
        let mut store = setup();

        let account = store.login("john@example.com", "password123").unwrap();

        assert_eq!(account.name, "John Doe");
        assert!(store.is_authenticated());
        assert_eq!(
            store.current_user().map(|a| a.email.as_str()),
            Some("john@example.com")
        );
    }

    #[test]
    fn test_login_is_case_insensitive() {
        let mut store = setup();
        assert!(store.login("JOHN@Example.COM", "x").is_ok());
    }

    #[test]
    fn test_login_ignores_password_value() {
        let mut store = setup();
        assert!(store.login("john@example.com", "").is_ok());

        store.logout().unwrap();
        assert!(store.login("john@example.com", "anything at all").is_ok());
    }

    #[test]
    fn test_login_unknown_email_fails() {
        let mut store = setup();

        let result = store.login("nobody@example.com", "password123");

        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_signup_appends_and_logs_in() {
        let mut store = setup();

        let account = store.signup(customer_draft("new@example.com"), "pw").unwrap();

        assert_eq!(store.accounts().len(), 3);
        assert!(store.is_authenticated());
        assert_eq!(store.current_user().map(|a| a.id.as_str()), Some(account.id.as_str()));
        assert!(store.accounts().iter().any(|a| a.email == "new@example.com"));
    }

    #[test]
    fn test_signup_driver_starts_unverified() {
        let mut store = setup();

        let account = store.signup(driver_draft("driver@example.com"), "pw").unwrap();

        assert_eq!(account.role(), Role::Driver);
        assert!(!account.is_verified_driver());
    }

    #[test]
    fn test_signup_duplicate_email_rejected() {
        let mut store = setup();

        let result = store.signup(customer_draft("jane@example.com"), "pw");

        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.accounts().len(), 2);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_signup_duplicate_email_case_insensitive() {
        let mut store = setup();

        let result = store.signup(customer_draft("JANE@EXAMPLE.COM"), "pw");

        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.accounts().len(), 2);
    }

    #[test]
    fn test_signup_empty_email_rejected() {
        let mut store = setup();

        let result = store.signup(customer_draft("   "), "pw");

        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert_eq!(store.accounts().len(), 2);
    }

    #[test]
    fn test_signup_ids_are_unique() {
        let mut store = setup();

        let a = store.signup(customer_draft("a@example.com"), "pw").unwrap();
        let b = store.signup(customer_draft("b@example.com"), "pw").unwrap();

        assert_ne!(a.id, b.id);
        assert!(store.accounts().iter().all(|acc| !acc.id.is_empty()));
    }

    #[test]
    fn test_drivers_filters_roster() {
        let mut store = setup();
        store.signup(driver_draft("d2@example.com"), "pw").unwrap();

        let drivers = store.drivers();

        assert_eq!(drivers.len(), 2);
        assert!(drivers.iter().all(|a| a.is_driver()));
    }

    #[test]
    fn test_roster_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut store = IdentityStore::open(FileKv::new(temp_dir.path())).unwrap();
            store.signup(customer_draft("new@example.com"), "pw").unwrap();
        }

        let reopened = IdentityStore::open(FileKv::new(temp_dir.path())).unwrap();
        assert_eq!(reopened.accounts().len(), 3);
        assert!(reopened
            .accounts()
            .iter()
            .any(|a| a.email == "new@example.com"));
    }

    #[test]
    fn test_session_restored_on_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut store = IdentityStore::open(FileKv::new(temp_dir.path())).unwrap();
            store.login("john@example.com", "pw").unwrap();
        }

        let reopened = IdentityStore::open(FileKv::new(temp_dir.path())).unwrap();
        assert!(reopened.is_authenticated());
        assert_eq!(
            reopened.current_user().map(|a| a.email.as_str()),
            Some("john@example.com")
        );
    }

    #[test]
    fn test_logout_clears_persisted_session() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut store = IdentityStore::open(FileKv::new(temp_dir.path())).unwrap();
            store.login("john@example.com", "pw").unwrap();
            store.logout().unwrap();
            assert!(!store.is_authenticated());
        }

        assert!(!temp_dir.path().join("loadloop-current-user.json").exists());

        let reopened = IdentityStore::open(FileKv::new(temp_dir.path())).unwrap();
        assert!(!reopened.is_authenticated());
    }

    #[test]
    fn test_corrupt_roster_falls_back_to_seed() {
        let temp_dir = TempDir::new().unwrap();
        let users_path = temp_dir.path().join("loadloop-users.json");
        std::fs::write(&users_path, "not valid json").unwrap();

        let store = IdentityStore::open(FileKv::new(temp_dir.path())).unwrap();

        assert_eq!(store.accounts().len(), 2);
        // The unreadable record is left in place for inspection
        assert_eq!(
            std::fs::read_to_string(&users_path).unwrap(),
            "not valid json"
        );
    }

    #[test]
    fn test_corrupt_session_starts_logged_out() {
        let mut kv = MemoryKv::new();
        kv.set(SESSION_KEY, "{{{").unwrap();

        let store = IdentityStore::open(kv).unwrap();

        assert!(!store.is_authenticated());
        assert_eq!(store.accounts().len(), 2);
    }
}
