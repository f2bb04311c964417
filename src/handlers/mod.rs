pub mod common;
pub mod countries;
pub mod item_statuses;
pub mod items;
pub mod locations;
pub mod pharmacies;

use crate::auth::AuthService;
use crate::db::DbPool;
use crate::repositories::{
    CountryRepository, ItemRepository, ItemStatusRepository, LocationRepository,
    PharmacyRepository,
};
use crate::services::{
    CountryService, ItemService, ItemStatusService, LocationService, PharmacyService,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub countries: Arc<CountryService>,
    pub locations: Arc<LocationService>,
    pub item_statuses: Arc<ItemStatusService>,
    pub pharmacies: Arc<PharmacyService>,
    pub items: Arc<ItemService>,
}

impl AppServices {
    /// Wire the repository and service graph over one connection pool
    pub fn new(db_pool: Arc<DbPool>, auth_service: Arc<AuthService>) -> Self {
        let country_repository = CountryRepository::new(db_pool.clone());
        let location_repository = LocationRepository::new(db_pool.clone());
        let item_status_repository = ItemStatusRepository::new(db_pool.clone());
        let pharmacy_repository = PharmacyRepository::new(db_pool.clone());
        let item_repository = ItemRepository::new(db_pool);

        let countries = Arc::new(CountryService::new(country_repository.clone()));
        let locations = Arc::new(LocationService::new(
            location_repository.clone(),
            country_repository,
        ));
        let item_statuses = Arc::new(ItemStatusService::new(item_status_repository.clone()));
        let pharmacies = Arc::new(PharmacyService::new(
            pharmacy_repository.clone(),
            location_repository,
            auth_service,
        ));
        let items = Arc::new(ItemService::new(
            item_repository,
            item_status_repository,
            pharmacy_repository,
        ));

        Self {
            countries,
            locations,
            item_statuses,
            pharmacies,
            items,
        }
    }
}
