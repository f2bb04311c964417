use sea_orm::Set;
use tracing::{error, info, instrument};

use crate::entities::country;
use crate::errors::ServiceError;
use crate::repositories::CountryRepository;

/// Service for managing countries
#[derive(Debug, Clone)]
pub struct CountryService {
    repository: CountryRepository,
}

impl CountryService {
    pub fn new(repository: CountryRepository) -> Self {
        Self { repository }
    }

    /// Get all countries
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<country::Model>, ServiceError> {
        self.repository.find_all().await
    }

    /// Get a country by ID
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<country::Model, ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput("Invalid country ID".to_string()));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Country not found".to_string()))
    }

    /// Create a new country
    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<country::Model, ServiceError> {
        let name = name.trim();
        self.validate_name(name)?;
        self.ensure_name_free(name, None).await?;

        let created = self
            .repository
            .create(country::ActiveModel {
                name: Set(name.to_string()),
                ..Default::default()
            })
            .await?;

        info!(country_id = %created.id, name = %created.name, "Country created");

        Ok(created)
    }

    /// Update an existing country
    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, name: &str) -> Result<country::Model, ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput("Invalid country ID".to_string()));
        }

        let name = name.trim();
        self.validate_name(name)?;

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Country not found".to_string()))?;

        self.ensure_name_free(name, Some(existing.id)).await?;

        let mut active: country::ActiveModel = existing.into();
        active.name = Set(name.to_string());

        let updated = self.repository.update(active).await?;

        info!(country_id = %updated.id, name = %updated.name, "Country updated");

        Ok(updated)
    }

    /// Delete a country; refused while any location references it
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput("Invalid country ID".to_string()));
        }

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(ServiceError::NotFound("Country not found".to_string()));
        }

        if self.repository.has_locations(id).await? {
            return Err(ServiceError::Conflict(
                "Cannot delete country with associated locations".to_string(),
            ));
        }

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            error!(country_id = %id, "Country delete affected no rows");
            return Err(ServiceError::InternalError(
                "Failed to delete country".to_string(),
            ));
        }

        info!(country_id = %id, "Country deleted");

        Ok(())
    }

    /// Check whether a country exists
    pub async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
        self.repository.exists(id).await
    }

    /// Search countries by name; a blank term returns everything
    #[instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<country::Model>, ServiceError> {
        if name.trim().is_empty() {
            return self.get_all().await;
        }

        self.repository.search_by_name(name.trim()).await
    }

    fn validate_name(&self, name: &str) -> Result<(), ServiceError> {
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Country name is required".to_string(),
            ));
        }
        if name.len() > 100 {
            return Err(ServiceError::ValidationError(
                "Country name cannot exceed 100 characters".to_string(),
            ));
        }
        Ok(())
    }

    /// Duplicate scan is case-insensitive; `exclude_id` skips the row being
    /// updated
    async fn ensure_name_free(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<(), ServiceError> {
        let candidates = self.repository.search_by_name(name).await?;
        let duplicate = candidates.iter().any(|c| {
            c.name.eq_ignore_ascii_case(name) && Some(c.id) != exclude_id
        });

        if duplicate {
            return Err(ServiceError::Conflict(
                "A country with this name already exists".to_string(),
            ));
        }

        Ok(())
    }
}
