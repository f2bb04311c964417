use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;

use crate::entities::item::{
    ActiveModel as ItemActiveModel, Column, Entity as Item, Model as ItemModel,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for item operations
#[derive(Debug, Clone)]
pub struct ItemRepository {
    base: BaseRepository,
}

impl ItemRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get all items ordered by name
    pub async fn find_all(&self) -> Result<Vec<ItemModel>, AppError> {
        Item::find()
            .order_by_asc(Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Find an item by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<ItemModel>, AppError> {
        Item::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Create a new item
    pub async fn create(&self, item: ItemActiveModel) -> Result<ItemModel, AppError> {
        item.insert(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Update an existing item
    pub async fn update(&self, item: ItemActiveModel) -> Result<ItemModel, AppError> {
        item.update(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Delete an item by ID; returns false when the row does not exist
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = Item::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(result.rows_affected > 0)
    }

    /// Check whether an item exists
    pub async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let count = Item::find_by_id(id)
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
        let mut query = Item::find().filter(
            Expr::expr(Func::lower(Expr::col((Item, Column::Name)))).eq(name.to_lowercase()),
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
