use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub mod country_repository;
pub mod item_repository;
pub mod item_status_repository;
pub mod location_repository;
pub mod pharmacy_repository;

pub use country_repository::CountryRepository;
pub use item_repository::ItemRepository;
pub use item_status_repository::ItemStatusRepository;
pub use location_repository::LocationRepository;
pub use pharmacy_repository::PharmacyRepository;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
