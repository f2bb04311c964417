use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;

use crate::entities::item_status::{
    ActiveModel as ItemStatusActiveModel, Column, Entity as ItemStatus, Model as ItemStatusModel,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for item status operations
#[derive(Debug, Clone)]
pub struct ItemStatusRepository {
    base: BaseRepository,
}

impl ItemStatusRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get all item statuses ordered by status text
    pub async fn find_all(&self) -> Result<Vec<ItemStatusModel>, AppError> {
        ItemStatus::find()
            .order_by_asc(Column::Status)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Find an item status by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<ItemStatusModel>, AppError> {
        ItemStatus::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Create a new item status
    pub async fn create(
        &self,
        item_status: ItemStatusActiveModel,
    ) -> Result<ItemStatusModel, AppError> {
        item_status
            .insert(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Update an existing item status
    pub async fn update(
        &self,
        item_status: ItemStatusActiveModel,
    ) -> Result<ItemStatusModel, AppError> {
        item_status
            .update(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Delete an item status by ID; returns false when the row does not exist
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = ItemStatus::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(result.rows_affected > 0)
    }

    /// Check whether an item status exists
    pub async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let count = ItemStatus::find_by_id(id)
            .count(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(count > 0)
    }

    /// Search item statuses by (partial) status text
    pub async fn search_by_status(&self, status: &str) -> Result<Vec<ItemStatusModel>, AppError> {
        ItemStatus::find()
            .filter(Column::Status.contains(status))
            .order_by_asc(Column::Status)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }
}
