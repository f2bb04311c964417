use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{password, roles, AuthService};
use crate::entities::pharmacy;
use crate::errors::ServiceError;
use crate::repositories::{LocationRepository, PharmacyRepository};

/// Length of the throwaway credential assigned to provisioned accounts
const PROVISIONED_PASSWORD_LEN: usize = 24;

/// Pharmacy list row enriched with location and user display names
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PharmacyRow {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub is_active: bool,
    pub user_id: Uuid,
    pub user_display_name: Option<String>,
    pub account_number: Option<String>,
    pub location_id: Option<i32>,
    pub location_label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields accepted when creating or updating a pharmacy
#[derive(Debug, Clone)]
pub struct PharmacyInput {
    pub name: String,
    pub username: String,
    pub password: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub is_active: bool,
    pub user_id: Option<Uuid>,
    pub account_number: Option<String>,
    pub location_id: Option<i32>,
}

/// Service for managing pharmacies.
///
/// Creation can provision the administering identity account: when the
/// posted username is unknown to the identity store, an Admin-role user is
/// created with a random throwaway credential and linked before the
/// pharmacy row is inserted.
#[derive(Clone)]
pub struct PharmacyService {
    repository: PharmacyRepository,
    locations: LocationRepository,
    auth: Arc<AuthService>,
}

impl PharmacyService {
    pub fn new(
        repository: PharmacyRepository,
        locations: LocationRepository,
        auth: Arc<AuthService>,
    ) -> Self {
        Self {
            repository,
            locations,
            auth,
        }
    }

    /// Get all pharmacies with display names
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<PharmacyRow>, ServiceError> {
        let pharmacies = self.repository.find_all().await?;
        self.enrich(pharmacies).await
    }

    /// Get the pharmacies linked to one identity user
    #[instrument(skip(self))]
    pub async fn get_all_for_user(&self, user_id: Uuid) -> Result<Vec<PharmacyRow>, ServiceError> {
        let pharmacies = self.repository.find_by_user(user_id).await?;
        self.enrich(pharmacies).await
    }

    /// Get a pharmacy by ID
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<pharmacy::Model, ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput(
                "Invalid pharmacy ID".to_string(),
            ));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Pharmacy not found".to_string()))
    }

    /// Create a new pharmacy, provisioning the identity account if needed
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: PharmacyInput) -> Result<pharmacy::Model, ServiceError> {
        self.validate_fields(&input)?;
        self.ensure_location(input.location_id).await?;
        self.ensure_name_free(input.name.trim(), None).await?;

        // The identity account must exist before the pharmacy row can
        // reference it
        let user_id = self.resolve_user(&input).await?;

        let created = self
            .repository
            .create(pharmacy::ActiveModel {
                name: Set(input.name.trim().to_string()),
                username: Set(input.username.trim().to_string()),
                password: Set(normalize_optional(input.password)),
                latitude: Set(normalize_optional(input.latitude)),
                longitude: Set(normalize_optional(input.longitude)),
                is_active: Set(input.is_active),
                user_id: Set(user_id),
                account_number: Set(normalize_optional(input.account_number)),
                location_id: Set(input.location_id),
                ..Default::default()
            })
            .await?;

        info!(pharmacy_id = %created.id, name = %created.name, "Pharmacy created");

        Ok(created)
    }

    /// Update an existing pharmacy; only the mutable fields are overwritten
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: PharmacyInput,
    ) -> Result<pharmacy::Model, ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput(
                "Invalid pharmacy ID".to_string(),
            ));
        }

        self.validate_fields(&input)?;

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Pharmacy not found".to_string()))?;

        self.ensure_location(input.location_id).await?;
        self.ensure_name_free(input.name.trim(), Some(existing.id))
            .await?;

        let current_user_id = existing.user_id;
        let mut active: pharmacy::ActiveModel = existing.into();
        active.name = Set(input.name.trim().to_string());
        active.username = Set(input.username.trim().to_string());
        active.password = Set(normalize_optional(input.password));
        active.latitude = Set(normalize_optional(input.latitude));
        active.longitude = Set(normalize_optional(input.longitude));
        active.is_active = Set(input.is_active);
        active.user_id = Set(input.user_id.unwrap_or(current_user_id));
        active.account_number = Set(normalize_optional(input.account_number));
        active.location_id = Set(input.location_id);

        let updated = self.repository.update(active).await?;

        info!(pharmacy_id = %updated.id, name = %updated.name, "Pharmacy updated");

        Ok(updated)
    }

    /// Delete a pharmacy
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidInput(
                "Invalid pharmacy ID".to_string(),
            ));
        }

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(ServiceError::NotFound("Pharmacy not found".to_string()));
        }

        info!(pharmacy_id = %id, "Pharmacy deleted");

        Ok(())
    }

    /// Check whether a pharmacy exists
    pub async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
        self.repository.exists(id).await
    }

    /// Case-insensitive name collision check; blank names never collide
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

    /// Resolve the identity account for a pharmacy being created.
    ///
    /// An existing account with the posted username (email) wins; otherwise
    /// an explicitly selected user is linked; otherwise a new Admin-role
    /// account is provisioned with a random credential. The credential is
    /// discarded, so the account must use the password-reset flow before
    /// first login. Two concurrent creations of the same new username can
    /// race; the unique email index makes one of them fail.
    async fn resolve_user(&self, input: &PharmacyInput) -> Result<Uuid, ServiceError> {
        let username = input.username.trim();

        if let Some(existing) = self.auth.find_user_by_email(username).await.map_err(auth_err)? {
            return Ok(existing.id);
        }

        if let Some(user_id) = input.user_id {
            return Ok(user_id);
        }

        let throwaway = password::generate_password(PROVISIONED_PASSWORD_LEN);
        let provisioned = self
            .auth
            .create_user(input.name.trim(), username, &throwaway, roles::ADMIN)
            .await
            .map_err(auth_err)?;

        info!(
            user_id = %provisioned.id,
            email = %provisioned.email,
            "Provisioned Admin account for new pharmacy"
        );

        Ok(provisioned.id)
    }

    async fn enrich(
        &self,
        pharmacies: Vec<pharmacy::Model>,
    ) -> Result<Vec<PharmacyRow>, ServiceError> {
        use sea_orm::EntityTrait;

        let locations: HashMap<i32, String> = self
            .locations
            .find_all()
            .await?
            .into_iter()
            .map(|(l, _)| (l.id, format!("{}, {}", l.street, l.city)))
            .collect();

        let users: HashMap<Uuid, String> = crate::auth::user::Entity::find()
            .all(&*self.auth.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|u| (u.id, u.full_name))
            .collect();

        Ok(pharmacies
            .into_iter()
            .map(|p| PharmacyRow {
                id: p.id,
                name: p.name,
                username: p.username,
                latitude: p.latitude,
                longitude: p.longitude,
                is_active: p.is_active,
                user_id: p.user_id,
                user_display_name: users.get(&p.user_id).cloned(),
                account_number: p.account_number,
                location_id: p.location_id,
                location_label: p.location_id.and_then(|id| locations.get(&id).cloned()),
                created_at: p.created_at,
                updated_at: p.updated_at,
            })
            .collect())
    }

    fn validate_fields(&self, input: &PharmacyInput) -> Result<(), ServiceError> {
        let name = input.name.trim();
        let username = input.username.trim();

        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Pharmacy name is required".to_string(),
            ));
        }
        if name.len() > 100 {
            return Err(ServiceError::ValidationError(
                "Pharmacy name cannot exceed 100 characters".to_string(),
            ));
        }
        if username.is_empty() {
            return Err(ServiceError::ValidationError(
                "Username is required".to_string(),
            ));
        }
        if username.len() > 50 {
            return Err(ServiceError::ValidationError(
                "Username cannot exceed 50 characters".to_string(),
            ));
        }
        if let Some(password) = input.password.as_deref() {
            if password.len() > 100 {
                return Err(ServiceError::ValidationError(
                    "Password cannot exceed 100 characters".to_string(),
                ));
            }
        }
        if let Some(account_number) = input.account_number.as_deref() {
            if account_number.len() > 50 {
                return Err(ServiceError::ValidationError(
                    "Account number cannot exceed 50 characters".to_string(),
                ));
            }
        }

        Ok(())
    }

    async fn ensure_location(&self, location_id: Option<i32>) -> Result<(), ServiceError> {
        if let Some(location_id) = location_id {
            if !self.locations.exists(location_id).await? {
                return Err(ServiceError::InvalidInput(
                    "Invalid location specified".to_string(),
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
                "A pharmacy with this name already exists".to_string(),
            ));
        }
        Ok(())
    }
}

fn auth_err(err: crate::auth::AuthError) -> ServiceError {
    use crate::auth::AuthError;
    match err {
        AuthError::EmailTaken => {
            ServiceError::Conflict("Email address is already registered".to_string())
        }
        AuthError::UserNotFound => ServiceError::NotFound("User not found".to_string()),
        other => ServiceError::InternalError(other.to_string()),
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
