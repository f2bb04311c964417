use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;

use crate::entities::country::{
    ActiveModel as CountryActiveModel, Column, Entity as Country, Model as CountryModel,
};
use crate::entities::location::{Column as LocationColumn, Entity as Location};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for country operations
#[derive(Debug, Clone)]
pub struct CountryRepository {
    base: BaseRepository,
}

impl CountryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get all countries ordered by name
    pub async fn find_all(&self) -> Result<Vec<CountryModel>, AppError> {
        Country::find()
            .order_by_asc(Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Find a country by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<CountryModel>, AppError> {
        Country::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Create a new country
    pub async fn create(&self, country: CountryActiveModel) -> Result<CountryModel, AppError> {
        country
            .insert(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Update an existing country
    pub async fn update(&self, country: CountryActiveModel) -> Result<CountryModel, AppError> {
        country
            .update(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Delete a country by ID; returns false when the row does not exist
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = Country::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(result.rows_affected > 0)
    }

    /// Check whether a country exists
    pub async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let count = Country::find_by_id(id)
            .count(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(count > 0)
    }

    /// Search countries by (partial) name
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<CountryModel>, AppError> {
        Country::find()
            .filter(Column::Name.contains(name))
            .order_by_asc(Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Check whether any location still references the country
    pub async fn has_locations(&self, id: i32) -> Result<bool, AppError> {
        let count = Location::find()
            .filter(LocationColumn::CountryId.eq(id))
            .count(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(count > 0)
    }
}
