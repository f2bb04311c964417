use crate::auth::{roles, AuthRouterExt, AuthenticatedUser};
use crate::entities::pharmacy;
use crate::errors::ApiError;
use crate::handlers::common::{
    client_message, effective_id, map_service_error, success_response, validation_messages,
    DeleteWithTableResponse, DropdownOption, FormQuery, SaveWithTableResponse, UserOption,
};
use crate::services::pharmacies::{PharmacyInput, PharmacyRow};
use crate::{ApiResponse, AppState};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Creates the router for pharmacy endpoints (Admin only)
pub fn pharmacies_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pharmacies))
        .route("/form", get(pharmacy_form))
        .route("/save/:id", post(save_pharmacy))
        .route("/delete/:id", post(delete_pharmacy))
        .with_roles(roles::ADMIN)
}

/// Prefilled pharmacy form payload with dropdowns
#[derive(Debug, Serialize, ToSchema)]
pub struct PharmacyFormResponse {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub is_active: bool,
    pub user_id: Option<Uuid>,
    pub account_number: Option<String>,
    pub location_id: Option<i32>,
    pub available_locations: Vec<DropdownOption>,
    pub available_users: Vec<UserOption>,
}

/// Posted pharmacy form fields
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SavePharmacyRequest {
    #[serde(default)]
    pub id: i32,
    #[validate(length(min = 1, max = 100, message = "Pharmacy name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Username is required"))]
    pub username: String,
    #[validate(length(max = 100, message = "Password cannot exceed 100 characters"))]
    pub password: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub user_id: Option<Uuid>,
    #[validate(length(max = 50, message = "Account number cannot exceed 50 characters"))]
    pub account_number: Option<String>,
    pub location_id: Option<i32>,
}

fn default_true() -> bool {
    true
}

impl SavePharmacyRequest {
    fn into_input(self) -> PharmacyInput {
        PharmacyInput {
            name: self.name,
            username: self.username,
            password: self.password,
            latitude: self.latitude,
            longitude: self.longitude,
            is_active: self.is_active,
            user_id: self.user_id,
            account_number: self.account_number,
            location_id: self.location_id,
        }
    }
}

/// List pharmacies. A caller holding Admin but not SuperAdmin sees only
/// the rows linked to their own account.
#[utoipa::path(
    get,
    path = "/api/v1/pharmacies",
    responses(
        (status = 200, description = "Pharmacy table", body = crate::ApiResponse<Vec<PharmacyRow>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Pharmacies"
)]
pub async fn list_pharmacies(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let pharmacies = if user.is_super_admin() {
        state.services.pharmacies.get_all().await
    } else {
        let user_id = user.user_uuid().map_err(|_| ApiError::Unauthorized)?;
        state.services.pharmacies.get_all_for_user(user_id).await
    }
    .map_err(map_service_error)?;

    Ok(success_response(ApiResponse::success(pharmacies)))
}

/// Blank or prefilled pharmacy form payload. A blank form defaults the
/// linked user to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/pharmacies/form",
    params(FormQuery),
    responses(
        (status = 200, description = "Form payload", body = crate::ApiResponse<PharmacyFormResponse>),
        (status = 404, description = "Pharmacy not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Pharmacies"
)]
pub async fn pharmacy_form(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let available_locations = location_dropdown(&state).await?;
    let available_users = user_dropdown(&state).await?;

    if query.id == 0 {
        return Ok(success_response(ApiResponse::success(
            PharmacyFormResponse {
                id: 0,
                name: String::new(),
                username: String::new(),
                latitude: None,
                longitude: None,
                is_active: true,
                user_id: user.user_uuid().ok(),
                account_number: None,
                location_id: None,
                available_locations,
                available_users,
            },
        )));
    }

    let pharmacy = state
        .services
        .pharmacies
        .get_by_id(query.id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ApiResponse::success(form_from_model(
        pharmacy,
        available_locations,
        available_users,
    ))))
}

/// Create or update a pharmacy. The posted body's id wins when non-zero,
/// else the route id is used. Creation provisions an Admin identity
/// account when the username is unknown.
#[utoipa::path(
    post,
    path = "/api/v1/pharmacies/save/:id",
    request_body = SavePharmacyRequest,
    responses(
        (status = 200, description = "Save outcome with refreshed table", body = SaveWithTableResponse<PharmacyRow>),
        (status = 500, description = "Unexpected failure", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Pharmacies"
)]
pub async fn save_pharmacy(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(route_id): Path<i32>,
    Json(payload): Json<SavePharmacyRequest>,
) -> Result<Json<SaveWithTableResponse<PharmacyRow>>, ApiError> {
    if let Some(errors) = validation_messages(&payload) {
        return Ok(Json(SaveWithTableResponse::invalid(errors)));
    }

    let id = effective_id(route_id, payload.id);
    let input = payload.into_input();

    let (result, message) = if id == 0 {
        (
            state.services.pharmacies.create(input).await,
            "Pharmacy added successfully",
        )
    } else {
        (
            state.services.pharmacies.update(id, input).await,
            "Pharmacy updated successfully",
        )
    };

    match result {
        Ok(_) => {
            let rows = refreshed_table(&user, &state).await?;
            Ok(Json(SaveWithTableResponse::saved(message, rows)))
        }
        Err(err) => match client_message(&err) {
            Some(message) => Ok(Json(SaveWithTableResponse::rejected(message))),
            None => Err(map_service_error(err)),
        },
    }
}

/// Delete a pharmacy
#[utoipa::path(
    post,
    path = "/api/v1/pharmacies/delete/:id",
    responses(
        (status = 200, description = "Delete outcome with refreshed table", body = DeleteWithTableResponse<PharmacyRow>),
        (status = 500, description = "Unexpected failure", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Pharmacies"
)]
pub async fn delete_pharmacy(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteWithTableResponse<PharmacyRow>>, ApiError> {
    match state.services.pharmacies.delete(id).await {
        Ok(()) => {
            let rows = refreshed_table(&user, &state).await?;
            Ok(Json(DeleteWithTableResponse::deleted(
                "Pharmacy deleted successfully",
                rows,
            )))
        }
        Err(err) => match client_message(&err) {
            Some(message) => Ok(Json(DeleteWithTableResponse::rejected(message))),
            None => Err(map_service_error(err)),
        },
    }
}

/// Refreshed table rows honour the same per-caller scoping as the list
async fn refreshed_table(
    user: &AuthenticatedUser,
    state: &AppState,
) -> Result<Vec<PharmacyRow>, ApiError> {
    if user.is_super_admin() {
        state.services.pharmacies.get_all().await
    } else {
        let user_id = user.user_uuid().map_err(|_| ApiError::Unauthorized)?;
        state.services.pharmacies.get_all_for_user(user_id).await
    }
    .map_err(map_service_error)
}

fn form_from_model(
    pharmacy: pharmacy::Model,
    available_locations: Vec<DropdownOption>,
    available_users: Vec<UserOption>,
) -> PharmacyFormResponse {
    PharmacyFormResponse {
        id: pharmacy.id,
        name: pharmacy.name,
        username: pharmacy.username,
        latitude: pharmacy.latitude,
        longitude: pharmacy.longitude,
        is_active: pharmacy.is_active,
        user_id: Some(pharmacy.user_id),
        account_number: pharmacy.account_number,
        location_id: pharmacy.location_id,
        available_locations,
        available_users,
    }
}

async fn location_dropdown(state: &AppState) -> Result<Vec<DropdownOption>, ApiError> {
    let locations = state
        .services
        .locations
        .get_all()
        .await
        .map_err(map_service_error)?;

    Ok(locations
        .into_iter()
        .map(|l| DropdownOption {
            id: l.id,
            display_text: format!("{}, {}", l.street, l.city),
        })
        .collect())
}

async fn user_dropdown(state: &AppState) -> Result<Vec<UserOption>, ApiError> {
    let users = state
        .auth
        .list_users()
        .await
        .map_err(|_| ApiError::InternalServerError)?;

    Ok(users
        .into_iter()
        .map(|u| UserOption {
            id: u.id,
            display_text: u.full_name,
        })
        .collect())
}
