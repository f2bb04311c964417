use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::Set;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::entities::item;
use crate::errors::ServiceError;
use crate::repositories::{ItemRepository, ItemStatusRepository, PharmacyRepository};

/// Item list row enriched with status and pharmacy display names
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub item_status_id: i32,
    pub item_status_name: String,
    pub code: Option<String>,
    pub inserted_by: Option<String>,
    pub insert_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub update_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub stock: Option<i32>,
    pub pharmacy_id: i32,
    pub pharmacy_name: String,
}

/// Fields accepted when creating or updating an item
#[derive(Debug, Clone)]
pub struct ItemInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub item_status_id: i32,
    pub code: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub stock: Option<i32>,
    pub pharmacy_id: i32,
}

/// Service for managing pharmacy items
#[derive(Debug, Clone)]
pub struct ItemService {
    repository: ItemRepository,
    item_statuses: ItemStatusRepository,
    pharmacies: PharmacyRepository,
}

impl ItemService {
    pub fn new(
        repository: ItemRepository,
        item_statuses: ItemStatusRepository,
        pharmacies: PharmacyRepository,
    ) -> Self {
        Self {
            repository,
            item_statuses,
            pharmacies,
        }
    }

    /// Get all items with display names
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<ItemRow>, ServiceError> {
        let items = self.repository.find_all().await?;
        self.enrich(items).await
    }

    /// Get an item by ID for editing
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<item::Model, ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput("Invalid item ID".to_string()));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))
    }

    /// Create a new item; `user_name` is stamped as the inserting identity
    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: ItemInput,
        user_name: &str,
    ) -> Result<item::Model, ServiceError> {
        self.validate_fields(&input)?;
        self.ensure_name_free(input.name.trim(), None).await?;

        let created = self
            .repository
            .create(item::ActiveModel {
                name: Set(input.name.trim().to_string()),
                description: Set(normalize_optional(input.description)),
                price: Set(input.price),
                item_status_id: Set(input.item_status_id),
                code: Set(normalize_optional(input.code)),
                inserted_by: Set(Some(user_name.to_string())),
                insert_date: Set(Some(Utc::now())),
                expiry_date: Set(input.expiry_date),
                updated_by: Set(None),
                update_date: Set(None),
                is_active: Set(input.is_active),
                stock: Set(input.stock),
                pharmacy_id: Set(input.pharmacy_id),
                ..Default::default()
            })
            .await?;

        info!(item_id = %created.id, name = %created.name, "Item created");

        Ok(created)
    }

    /// Update an existing item; the insert audit fields are preserved and
    /// `user_name` is stamped as the updating identity
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: ItemInput,
        user_name: &str,
    ) -> Result<item::Model, ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput("Invalid item ID".to_string()));
        }

        self.validate_fields(&input)?;

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item not found".to_string()))?;

        self.ensure_name_free(input.name.trim(), Some(existing.id))
            .await?;

        let mut active: item::ActiveModel = existing.into();
        active.name = Set(input.name.trim().to_string());
        active.description = Set(normalize_optional(input.description));
        active.price = Set(input.price);
        active.item_status_id = Set(input.item_status_id);
        active.code = Set(normalize_optional(input.code));
        active.expiry_date = Set(input.expiry_date);
        active.is_active = Set(input.is_active);
        active.stock = Set(input.stock);
        active.pharmacy_id = Set(input.pharmacy_id);
        active.updated_by = Set(Some(user_name.to_string()));
        active.update_date = Set(Some(Utc::now()));

        let updated = self.repository.update(active).await?;

        info!(item_id = %updated.id, name = %updated.name, "Item updated");

        Ok(updated)
    }

    /// Delete an item
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput("Invalid item ID".to_string()));
        }

        if !self.repository.exists(id).await? {
            return Err(ServiceError::NotFound("Item not found".to_string()));
        }

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(ServiceError::InternalError(
                "Failed to delete item".to_string(),
            ));
        }

        info!(item_id = %id, "Item deleted");

        Ok(())
    }

    /// Case-insensitive name collision check; `exclude_id` skips the row
    /// being updated
    #[instrument(skip(self))]
    pub async fn name_exists(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, ServiceError> {
        if name.trim().is_empty() {
            return Ok(false);
        }

        self.repository.name_exists(name.trim(), exclude_id).await
    }

    async fn enrich(&self, items: Vec<item::Model>) -> Result<Vec<ItemRow>, ServiceError> {
        let statuses: HashMap<i32, String> = self
            .item_statuses
            .find_all()
            .await?
            .into_iter()
            .map(|s| (s.id, s.status))
            .collect();

        let pharmacies: HashMap<i32, String> = self
            .pharmacies
            .find_all()
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        Ok(items
            .into_iter()
            .map(|i| {
                let item_status_name = statuses
                    .get(&i.item_status_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string());
                let pharmacy_name = pharmacies
                    .get(&i.pharmacy_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string());
                ItemRow {
                    id: i.id,
                    name: i.name,
                    description: i.description,
                    price: i.price,
                    item_status_id: i.item_status_id,
                    item_status_name,
                    code: i.code,
                    inserted_by: i.inserted_by,
                    insert_date: i.insert_date,
                    expiry_date: i.expiry_date,
                    updated_by: i.updated_by,
                    update_date: i.update_date,
                    is_active: i.is_active,
                    stock: i.stock,
                    pharmacy_id: i.pharmacy_id,
                    pharmacy_name,
                }
            })
            .collect())
    }

    fn validate_fields(&self, input: &ItemInput) -> Result<(), ServiceError> {
        let name = input.name.trim();

        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Item name is required".to_string(),
            ));
        }
        if name.len() > 100 {
            return Err(ServiceError::ValidationError(
                "Item name cannot exceed 100 characters".to_string(),
            ));
        }
        if let Some(description) = input.description.as_deref() {
            if description.len() > 500 {
                return Err(ServiceError::ValidationError(
                    "Description cannot exceed 500 characters".to_string(),
                ));
            }
        }
        if let Some(code) = input.code.as_deref() {
            if code.len() > 50 {
                return Err(ServiceError::ValidationError(
                    "Item code cannot exceed 50 characters".to_string(),
                ));
            }
        }
        if input.price <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Price must be greater than 0".to_string(),
            ));
        }
        if let Some(stock) = input.stock {
            if stock < 0 {
                return Err(ServiceError::ValidationError(
                    "Stock cannot be negative".to_string(),
                ));
            }
        }

        Ok(())
    }

    async fn ensure_name_free(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<(), ServiceError> {
        if self.repository.name_exists(name, exclude_id).await? {
            return Err(ServiceError::Conflict(
                "An item with this name already exists".to_string(),
            ));
        }
        Ok(())
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
