use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::pharmacy::{
    ActiveModel as PharmacyActiveModel, Column, Entity as Pharmacy, Model as PharmacyModel,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for pharmacy operations
#[derive(Debug, Clone)]
pub struct PharmacyRepository {
    base: BaseRepository,
}

impl PharmacyRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get all pharmacies ordered by name
    pub async fn find_all(&self) -> Result<Vec<PharmacyModel>, AppError> {
        Pharmacy::find()
            .order_by_asc(Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Get pharmacies linked to one identity user, ordered by name
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<PharmacyModel>, AppError> {
        Pharmacy::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Find a pharmacy by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<PharmacyModel>, AppError> {
        Pharmacy::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Create a new pharmacy
    pub async fn create(&self, pharmacy: PharmacyActiveModel) -> Result<PharmacyModel, AppError> {
        pharmacy
            .insert(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Update an existing pharmacy
    pub async fn update(&self, pharmacy: PharmacyActiveModel) -> Result<PharmacyModel, AppError> {
        pharmacy
            .update(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Delete a pharmacy by ID; returns false when the row does not exist
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = Pharmacy::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(result.rows_affected > 0)
    }

    /// Check whether a pharmacy exists
    pub async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let count = Pharmacy::find_by_id(id)
            .count(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(count > 0)
    }

    /// Case-insensitive name collision check, optionally excluding one row
    pub async fn name_exists(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, AppError> {
        let mut query = Pharmacy::find().filter(
            Expr::expr(Func::lower(Expr::col((Pharmacy, Column::Name))))
                .eq(name.to_lowercase()),
        );

        if let Some(exclude_id) = exclude_id {
            query = query.filter(Column::Id.ne(exclude_id));
        }

        let count = query
            .count(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(count > 0)
    }
}
