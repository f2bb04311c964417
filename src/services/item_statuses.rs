use sea_orm::Set;
use tracing::{info, instrument};

use crate::entities::item_status;
use crate::errors::ServiceError;
use crate::repositories::ItemStatusRepository;

/// Service for managing item statuses
#[derive(Debug, Clone)]
pub struct ItemStatusService {
    repository: ItemStatusRepository,
}

impl ItemStatusService {
    pub fn new(repository: ItemStatusRepository) -> Self {
        Self { repository }
    }

    /// Get all item statuses
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<item_status::Model>, ServiceError> {
        self.repository.find_all().await
    }

    /// Get an item status by ID
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<item_status::Model, ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput(
                "Invalid item status ID".to_string(),
            ));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item status not found".to_string()))
    }

    /// Create a new item status
    #[instrument(skip(self))]
    pub async fn create(&self, status: &str) -> Result<item_status::Model, ServiceError> {
        let status = status.trim();
        self.validate_status(status)?;

        let created = self
            .repository
            .create(item_status::ActiveModel {
                status: Set(status.to_string()),
                ..Default::default()
            })
            .await?;

        info!(item_status_id = %created.id, status = %created.status, "Item status created");

        Ok(created)
    }

    /// Update an existing item status
    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, status: &str) -> Result<item_status::Model, ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput(
                "Invalid item status ID".to_string(),
            ));
        }

        let status = status.trim();
        self.validate_status(status)?;

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item status not found".to_string()))?;

        let mut active: item_status::ActiveModel = existing.into();
        active.status = Set(status.to_string());

        let updated = self.repository.update(active).await?;

        info!(item_status_id = %updated.id, status = %updated.status, "Item status updated");

        Ok(updated)
    }

    /// Delete an item status; deleting a missing row reports not-found
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput(
                "Invalid item status ID".to_string(),
            ));
        }

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(ServiceError::NotFound("Item status not found".to_string()));
        }

        info!(item_status_id = %id, "Item status deleted");

        Ok(())
    }

    /// Check whether an item status exists
    pub async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
        self.repository.exists(id).await
    }

    /// Search item statuses; a blank term returns everything
    #[instrument(skip(self))]
    pub async fn search_by_status(
        &self,
        status: &str,
    ) -> Result<Vec<item_status::Model>, ServiceError> {
        if status.trim().is_empty() {
            return self.get_all().await;
        }

        self.repository.search_by_status(status.trim()).await
    }

    fn validate_status(&self, status: &str) -> Result<(), ServiceError> {
        if status.is_empty() {
            return Err(ServiceError::ValidationError(
                "Status is required".to_string(),
            ));
        }
        if status.len() > 100 {
            return Err(ServiceError::ValidationError(
                "Status cannot exceed 100 characters".to_string(),
            ));
        }
        Ok(())
    }
}
