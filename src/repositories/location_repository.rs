use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;

use crate::entities::country::Model as CountryModel;
use crate::entities::location::{
    ActiveModel as LocationActiveModel, Column, Entity as Location, Model as LocationModel,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for location operations
#[derive(Debug, Clone)]
pub struct LocationRepository {
    base: BaseRepository,
}

impl LocationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get all locations with their owning country, ordered by city
    pub async fn find_all(
        &self,
    ) -> Result<Vec<(LocationModel, Option<CountryModel>)>, AppError> {
        Location::find()
            .find_also_related(crate::entities::country::Entity)
            .order_by_asc(Column::City)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Find a location by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<LocationModel>, AppError> {
        Location::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Create a new location
    pub async fn create(&self, location: LocationActiveModel) -> Result<LocationModel, AppError> {
        location
            .insert(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Update an existing location
    pub async fn update(&self, location: LocationActiveModel) -> Result<LocationModel, AppError> {
        location
            .update(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Delete a location by ID; returns false when the row does not exist
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = Location::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(result.rows_affected > 0)
    }

    /// Check whether a location exists
    pub async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let count = Location::find_by_id(id)
            .count(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(count > 0)
    }

    /// All locations belonging to one country
    pub async fn find_by_country(&self, country_id: i32) -> Result<Vec<LocationModel>, AppError> {
        Location::find()
            .filter(Column::CountryId.eq(country_id))
            .order_by_asc(Column::City)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Search locations by (partial) city name
    pub async fn search_by_city(&self, city: &str) -> Result<Vec<LocationModel>, AppError> {
        Location::find()
            .filter(Column::City.contains(city))
            .order_by_asc(Column::City)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }
}
