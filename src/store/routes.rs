//! Posted-route roster and search.
//!
//! Routes are persisted under `loadloop-routes`. The roster only grows:
//! posting appends, and nothing edits or removes a route. Writes are
//! authorized against the session account handed in by the caller; the
//! store never touches the session itself.

use chrono::NaiveDate;

use crate::models::{Account, Route, RouteDraft};

use super::kv::KeyValue;
use super::{encode, new_id, StoreError};

/// Key for the persisted route roster.
pub const ROUTES_KEY: &str = "loadloop-routes";

/// Owns the roster of posted routes and exposes search over it.
#[derive(Debug)]
pub struct RouteStore<K: KeyValue> {
    kv: K,
    routes: Vec<Route>,
}

impl<K: KeyValue> RouteStore<K> {
    /// Opens the store, seeding the roster on first use.
    ///
    /// An unreadable roster record falls back to the built-in routes in
    /// memory without overwriting the stored bytes.
    pub fn open(mut kv: K) -> Result<Self, StoreError> {
        let routes = match kv.get(ROUTES_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(routes) => routes,
                Err(e) => {
                    tracing::warn!(
                        "Stored route roster is unreadable, using built-in routes: {}",
                        e
                    );
                    seed_routes()
                }
            },
            None => {
                let routes = seed_routes();
                kv.set(ROUTES_KEY, &encode(&routes)?)?;
                routes
            }
        };

        tracing::info!("Loaded {} route(s)", routes.len());

        Ok(Self { kv, routes })
    }

    /// Posts a new route on behalf of `session`.
    ///
    /// Only a logged-in, verified driver may post; the route's owning
    /// driver id is taken from the session account, never from the
    /// draft.
    pub fn add_route(
        &mut self,
        draft: RouteDraft,
        session: Option<&Account>,
    ) -> Result<Route, StoreError> {
        let driver = session.ok_or_else(|| {
            StoreError::Unauthorized("Only verified drivers can post routes".to_string())
        })?;

        let profile = driver.driver_profile().ok_or_else(|| {
            StoreError::Unauthorized("Only verified drivers can post routes".to_string())
        })?;

        if !profile.verified {
            return Err(StoreError::Unauthorized(
                "Your account needs to be verified before posting routes".to_string(),
            ));
        }

        let route = Route {
            id: new_id("route"),
            driver_id: driver.id.clone(),
            origin: draft.origin,
            destination: draft.destination,
            date: draft.date,
            capacity: draft.capacity,
            vehicle_type: draft.vehicle_type,
        };

        // Persist before committing the new roster in memory
        let mut roster = self.routes.clone();
        roster.push(route.clone());
        self.kv.set(ROUTES_KEY, &encode(&roster)?)?;
        self.routes = roster;

        tracing::info!(
            "Posted route {} -> {} for driver {}",
            route.origin,
            route.destination,
            route.driver_id
        );
        Ok(route)
    }

    /// The full roster, in posting order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// All routes posted by `driver_id`, roster order preserved.
    pub fn routes_by_driver(&self, driver_id: &str) -> Vec<&Route> {
        self.routes
            .iter()
            .filter(|r| r.driver_id == driver_id)
            .collect()
    }

    /// Filters routes by origin and destination substrings,
    /// case-insensitively. Empty filters match everything, so
    /// `search("", "")` returns the whole roster.
    pub fn search(&self, origin: &str, destination: &str) -> Vec<&Route> {
        if origin.is_empty() && destination.is_empty() {
            return self.routes.iter().collect();
        }

        let origin = origin.to_lowercase();
        let destination = destination.to_lowercase();

        self.routes
            .iter()
            .filter(|r| {
                let origin_match =
                    origin.is_empty() || r.origin.to_lowercase().contains(&origin);
                let destination_match = destination.is_empty()
                    || r.destination.to_lowercase().contains(&destination);
                origin_match && destination_match
            })
            .collect()
    }
}

/// Built-in routes present on first run, both posted by the seed driver.
fn seed_routes() -> Vec<Route> {
    let seed = |id: &str, origin: &str, destination: &str, date, capacity: &str| Route {
        id: id.to_string(),
        driver_id: "1".to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        date,
        capacity: capacity.to_string(),
        vehicle_type: "Heavy Truck".to_string(),
    };

    vec![
        seed(
            "1",
            "Chennai",
            "Bangalore",
            NaiveDate::from_ymd_opt(2025, 5, 15).expect("valid date literal"),
            "20 tons",
        ),
        seed(
            "2",
            "Mumbai",
            "Pune",
            NaiveDate::from_ymd_opt(2025, 5, 18).expect("valid date literal"),
            "15 tons",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerProfile, DriverProfile, Profile};
    use crate::store::{FileKv, MemoryKv};
    use tempfile::TempDir;

    fn setup() -> RouteStore<MemoryKv> {
        RouteStore::open(MemoryKv::new()).unwrap()
    }

    fn driver_account(id: &str, verified: bool) -> Account {
        Account {
            id: id.to_string(),
            name: "Test Driver".to_string(),
            email: format!("{}@example.com", id),
            phone: "5550002222".to_string(),
            profile: Profile::Driver(DriverProfile {
                vehicle_type: "Heavy Truck".to_string(),
                plate_number: "TN-01-AB-1234".to_string(),
                experience_years: 5,
                total_kilometers: 50_000,
                languages: vec!["English".to_string()],
                verified,
                driver_photo: None,
                truck_image: None,
            }),
        }
    }

    fn customer_account() -> Account {
        Account {
            id: "c1".to_string(),
            name: "Test Customer".to_string(),
            email: "customer@example.com".to_string(),
            phone: "5550001111".to_string(),
            profile: Profile::Customer(CustomerProfile { company_name: None }),
        }
    }

    fn chennai_draft() -> RouteDraft {
        RouteDraft {
            origin: "Chennai".to_string(),
            destination: "Bangalore".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
            capacity: "20 tons".to_string(),
            vehicle_type: "Heavy Truck".to_string(),
        }
    }

    #[test]
    fn test_open_seeds_builtin_routes() {
        let store = setup();

        assert_eq!(store.routes().len(), 2);
        assert_eq!(store.routes()[0].origin, "Chennai");
        assert_eq!(store.routes()[1].destination, "Pune");
    }

    #[test]
    fn test_verified_driver_can_post() {
        let mut store = setup();
        let driver = driver_account("d99", true);

        let route = store.add_route(chennai_draft(), Some(&driver)).unwrap();

        assert_eq!(route.driver_id, "d99");
        assert_eq!(store.routes().len(), 3);

        let mine = store.routes_by_driver("d99");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].origin, "Chennai");
    }

    #[test]
    fn test_anonymous_post_rejected() {
        let mut store = setup();

        let result = store.add_route(chennai_draft(), None);

        assert!(matches!(result, Err(StoreError::Unauthorized(_))));
        assert_eq!(store.routes().len(), 2);
    }

    #[test]
    fn test_customer_post_rejected() {
        let mut store = setup();
        let customer = customer_account();

        let result = store.add_route(chennai_draft(), Some(&customer));

        assert!(matches!(result, Err(StoreError::Unauthorized(_))));
        assert_eq!(store.routes().len(), 2);
    }

    #[test]
    fn test_unverified_driver_post_rejected() {
        let mut store = setup();
        let driver = driver_account("d2", false);

        let result = store.add_route(chennai_draft(), Some(&driver));

        assert!(matches!(result, Err(StoreError::Unauthorized(_))));
        assert_eq!(store.routes().len(), 2);
    }

    #[test]
    fn test_routes_by_driver_preserves_order() {
        let store = setup();

        let seeded = store.routes_by_driver("1");

        assert_eq!(seeded.len(), 2);
        assert_eq!(seeded[0].origin, "Chennai");
        assert_eq!(seeded[1].origin, "Mumbai");
    }

    #[test]
    fn test_routes_by_unknown_driver_is_empty() {
        let store = setup();
        assert!(store.routes_by_driver("nobody").is_empty());
    }

    #[test]
    fn test_search_empty_filters_returns_all() {
        let store = setup();
        assert_eq!(store.search("", "").len(), 2);
    }

    #[test]
    fn test_search_origin_substring_case_insensitive() {
        let store = setup();

        let hits = store.search("chen", "");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].origin, "Chennai");
    }

    #[test]
    fn test_search_destination_only() {
        let store = setup();

        let hits = store.search("", "PUNE");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].origin, "Mumbai");
    }

    #[test]
    fn test_search_requires_both_filters_to_match() {
        let store = setup();

        // Chennai's destination is Bangalore, not Pune
        assert!(store.search("chennai", "pune").is_empty());
        assert_eq!(store.search("chennai", "bang").len(), 1);
    }

    #[test]
    fn test_search_no_match() {
        let store = setup();
        assert!(store.search("delhi", "").is_empty());
    }

    #[test]
    fn test_roster_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let driver = driver_account("d99", true);

        {
            let mut store = RouteStore::open(FileKv::new(temp_dir.path())).unwrap();
            store.add_route(chennai_draft(), Some(&driver)).unwrap();
        }

        let reopened = RouteStore::open(FileKv::new(temp_dir.path())).unwrap();
        assert_eq!(reopened.routes().len(), 3);
        assert_eq!(reopened.routes_by_driver("d99").len(), 1);
    }

    #[test]
    fn test_corrupt_roster_falls_back_to_seed() {
        let temp_dir = TempDir::new().unwrap();
        let routes_path = temp_dir.path().join("loadloop-routes.json");
        std::fs::write(&routes_path, "?!").unwrap();

        let store = RouteStore::open(FileKv::new(temp_dir.path())).unwrap();

        assert_eq!(store.routes().len(), 2);
        assert_eq!(std::fs::read_to_string(&routes_path).unwrap(), "?!");
    }
}
