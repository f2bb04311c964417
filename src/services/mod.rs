pub mod countries;
pub mod item_statuses;
pub mod items;
pub mod locations;
pub mod pharmacies;

pub use countries::CountryService;
pub use item_statuses::ItemStatusService;
pub use items::ItemService;
pub use locations::LocationService;
pub use pharmacies::PharmacyService;
