use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::entities::location;
use crate::errors::ServiceError;
use crate::repositories::{CountryRepository, LocationRepository};

/// Location list row enriched with the owning country's name
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationRow {
    pub id: i32,
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub country_id: i32,
    pub country_name: String,
    pub time_zone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating or updating a location
#[derive(Debug, Clone)]
pub struct LocationInput {
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub country_id: i32,
    pub time_zone: Option<String>,
}

/// Service for managing locations
#[derive(Debug, Clone)]
pub struct LocationService {
    repository: LocationRepository,
    countries: CountryRepository,
}

impl LocationService {
    pub fn new(repository: LocationRepository, countries: CountryRepository) -> Self {
        Self {
            repository,
            countries,
        }
    }

    /// Get all locations with their country names
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<LocationRow>, ServiceError> {
        let rows = self.repository.find_all().await?;
        Ok(rows
            .into_iter()
            .map(|(location, country)| to_row(location, country.map(|c| c.name)))
            .collect())
    }

    /// Get a location by ID
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<location::Model, ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput(
                "Invalid location ID".to_string(),
            ));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Location not found".to_string()))
    }

    /// Create a new location
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: LocationInput) -> Result<location::Model, ServiceError> {
        self.validate_fields(&input)?;
        self.ensure_country(input.country_id).await?;

        let created = self
            .repository
            .create(location::ActiveModel {
                street: Set(input.street.trim().to_string()),
                city: Set(input.city.trim().to_string()),
                state: Set(normalize_optional(input.state)),
                country_id: Set(input.country_id),
                time_zone: Set(normalize_optional(input.time_zone)),
                created_at: Set(Utc::now()),
                ..Default::default()
            })
            .await?;

        info!(location_id = %created.id, city = %created.city, "Location created");

        Ok(created)
    }

    /// Update an existing location; `created_at` is preserved
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: LocationInput,
    ) -> Result<location::Model, ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput(
                "Invalid location ID".to_string(),
            ));
        }

        self.validate_fields(&input)?;

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Location not found".to_string()))?;

        self.ensure_country(input.country_id).await?;

        let mut active: location::ActiveModel = existing.into();
        active.street = Set(input.street.trim().to_string());
        active.city = Set(input.city.trim().to_string());
        active.state = Set(normalize_optional(input.state));
        active.country_id = Set(input.country_id);
        active.time_zone = Set(normalize_optional(input.time_zone));

        let updated = self.repository.update(active).await?;

        info!(location_id = %updated.id, city = %updated.city, "Location updated");

        Ok(updated)
    }

    /// Delete a location
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput(
                "Invalid location ID".to_string(),
            ));
        }

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(ServiceError::NotFound("Location not found".to_string()));
        }

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(ServiceError::InternalError(
                "Failed to delete location".to_string(),
            ));
        }

        info!(location_id = %id, "Location deleted");

        Ok(())
    }

    /// Check whether a location exists
    pub async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
        self.repository.exists(id).await
    }

    /// All locations belonging to one country
    #[instrument(skip(self))]
    pub async fn get_by_country(&self, country_id: i32) -> Result<Vec<LocationRow>, ServiceError> {
        if country_id <= 0 {
            return Err(ServiceError::InvalidInput("Invalid country ID".to_string()));
        }

        if !self.countries.exists(country_id).await? {
            return Err(ServiceError::NotFound("Country not found".to_string()));
        }

        let locations = self.repository.find_by_country(country_id).await?;
        self.enrich(locations).await
    }

    /// Search locations by city; a blank term returns everything
    #[instrument(skip(self))]
    pub async fn search_by_city(&self, city: &str) -> Result<Vec<LocationRow>, ServiceError> {
        if city.trim().is_empty() {
            return self.get_all().await;
        }

        let locations = self.repository.search_by_city(city.trim()).await?;
        self.enrich(locations).await
    }

    async fn enrich(
        &self,
        locations: Vec<location::Model>,
    ) -> Result<Vec<LocationRow>, ServiceError> {
        let countries: HashMap<i32, String> = self
            .countries
            .find_all()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(locations
            .into_iter()
            .map(|l| {
                let name = countries.get(&l.country_id).cloned();
                to_row(l, name)
            })
            .collect())
    }

    fn validate_fields(&self, input: &LocationInput) -> Result<(), ServiceError> {
        let street = input.street.trim();
        let city = input.city.trim();

        if street.is_empty() {
            return Err(ServiceError::ValidationError(
                "Street is required".to_string(),
            ));
        }
        if city.is_empty() {
            return Err(ServiceError::ValidationError("City is required".to_string()));
        }
        if street.len() > 200 {
            return Err(ServiceError::ValidationError(
                "Street cannot exceed 200 characters".to_string(),
            ));
        }
        if city.len() > 100 {
            return Err(ServiceError::ValidationError(
                "City cannot exceed 100 characters".to_string(),
            ));
        }
        if let Some(state) = input.state.as_deref() {
            if state.len() > 100 {
                return Err(ServiceError::ValidationError(
                    "State cannot exceed 100 characters".to_string(),
                ));
            }
        }
        if let Some(time_zone) = input.time_zone.as_deref() {
            if time_zone.len() > 50 {
                return Err(ServiceError::ValidationError(
                    "TimeZone cannot exceed 50 characters".to_string(),
                ));
            }
        }
        if input.country_id <= 0 {
            return Err(ServiceError::ValidationError(
                "Valid country is required".to_string(),
            ));
        }

        Ok(())
    }

    async fn ensure_country(&self, country_id: i32) -> Result<(), ServiceError> {
        if !self.countries.exists(country_id).await? {
            return Err(ServiceError::InvalidInput(
                "Invalid country specified".to_string(),
            ));
        }
        Ok(())
    }
}

fn to_row(location: location::Model, country_name: Option<String>) -> LocationRow {
    LocationRow {
        id: location.id,
        street: location.street,
        city: location.city,
        state: location.state,
        country_id: location.country_id,
        country_name: country_name.unwrap_or_else(|| "Unknown".to_string()),
        time_zone: location.time_zone,
        created_at: location.created_at,
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
