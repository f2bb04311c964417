use crate::auth::AuthRouterExt;
use crate::errors::ApiError;
use crate::handlers::common::{
    client_message, effective_id, map_service_error, success_response, validation_messages,
    DeleteWithTableResponse, DropdownOption, FormQuery, SaveWithTableResponse,
};
use crate::services::locations::{LocationInput, LocationRow};
use crate::{ApiResponse, AppState};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Creates the router for location endpoints (any authenticated user)
pub fn locations_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locations))
        .route("/by-country/:country_id", get(locations_by_country))
        .route("/form", get(location_form))
        .route("/save/:id", post(save_location))
        .route("/delete/:id", post(delete_location))
        .with_auth()
}

/// Prefilled location form payload with the country dropdown
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationFormResponse {
    pub id: i32,
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub country_id: i32,
    pub time_zone: Option<String>,
    pub available_countries: Vec<DropdownOption>,
}

/// Posted location form fields
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveLocationRequest {
    #[serde(default)]
    pub id: i32,
    #[validate(length(min = 1, max = 200, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,
    #[validate(length(max = 100, message = "State cannot exceed 100 characters"))]
    pub state: Option<String>,
    pub country_id: i32,
    #[validate(length(max = 50, message = "TimeZone cannot exceed 50 characters"))]
    pub time_zone: Option<String>,
}

impl SaveLocationRequest {
    fn into_input(self) -> LocationInput {
        LocationInput {
            street: self.street,
            city: self.city,
            state: self.state,
            country_id: self.country_id,
            time_zone: self.time_zone,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct LocationSearchQuery {
    pub city: Option<String>,
}

/// List all locations, optionally filtered by city
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    params(LocationSearchQuery),
    responses(
        (status = 200, description = "Location table", body = crate::ApiResponse<Vec<LocationRow>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Locations"
)]
pub async fn list_locations(
    State(state): State<AppState>,
    Query(search): Query<LocationSearchQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let locations = match search.city.as_deref() {
        Some(city) => state.services.locations.search_by_city(city).await,
        None => state.services.locations.get_all().await,
    }
    .map_err(map_service_error)?;

    Ok(success_response(ApiResponse::success(locations)))
}

/// List the locations belonging to one country
#[utoipa::path(
    get,
    path = "/api/v1/locations/by-country/:country_id",
    responses(
        (status = 200, description = "Locations for the country", body = crate::ApiResponse<Vec<LocationRow>>),
        (status = 404, description = "Country not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Locations"
)]
pub async fn locations_by_country(
    State(state): State<AppState>,
    Path(country_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let locations = state
        .services
        .locations
        .get_by_country(country_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ApiResponse::success(locations)))
}

/// Blank or prefilled location form payload
#[utoipa::path(
    get,
    path = "/api/v1/locations/form",
    params(FormQuery),
    responses(
        (status = 200, description = "Form payload", body = crate::ApiResponse<LocationFormResponse>),
        (status = 404, description = "Location not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Locations"
)]
pub async fn location_form(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let available_countries = country_dropdown(&state).await?;

    if query.id == 0 {
        return Ok(success_response(ApiResponse::success(
            LocationFormResponse {
                id: 0,
                street: String::new(),
                city: String::new(),
                state: None,
                country_id: 0,
                time_zone: None,
                available_countries,
            },
        )));
    }

    let location = state
        .services
        .locations
        .get_by_id(query.id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ApiResponse::success(
        LocationFormResponse {
            id: location.id,
            street: location.street,
            city: location.city,
            state: location.state,
            country_id: location.country_id,
            time_zone: location.time_zone,
            available_countries,
        },
    )))
}

/// Create or update a location. The posted body's id wins when non-zero,
/// else the route id is used.
#[utoipa::path(
    post,
    path = "/api/v1/locations/save/:id",
    request_body = SaveLocationRequest,
    responses(
        (status = 200, description = "Save outcome with refreshed table", body = SaveWithTableResponse<LocationRow>),
        (status = 500, description = "Unexpected failure", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Locations"
)]
pub async fn save_location(
    State(state): State<AppState>,
    Path(route_id): Path<i32>,
    Json(payload): Json<SaveLocationRequest>,
) -> Result<Json<SaveWithTableResponse<LocationRow>>, ApiError> {
    if let Some(errors) = validation_messages(&payload) {
        return Ok(Json(SaveWithTableResponse::invalid(errors)));
    }

    let id = effective_id(route_id, payload.id);
    let input = payload.into_input();

    let (result, message) = if id == 0 {
        (
            state.services.locations.create(input).await,
            "Location added successfully",
        )
    } else {
        (
            state.services.locations.update(id, input).await,
            "Location updated successfully",
        )
    };

    match result {
        Ok(_) => {
            let rows = state
                .services
                .locations
                .get_all()
                .await
                .map_err(map_service_error)?;
            Ok(Json(SaveWithTableResponse::saved(message, rows)))
        }
        Err(err) => match client_message(&err) {
            Some(message) => Ok(Json(SaveWithTableResponse::rejected(message))),
            None => Err(map_service_error(err)),
        },
    }
}

/// Delete a location
#[utoipa::path(
    post,
    path = "/api/v1/locations/delete/:id",
    responses(
        (status = 200, description = "Delete outcome with refreshed table", body = DeleteWithTableResponse<LocationRow>),
        (status = 500, description = "Unexpected failure", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Locations"
)]
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteWithTableResponse<LocationRow>>, ApiError> {
    match state.services.locations.delete(id).await {
        Ok(()) => {
            let rows = state
                .services
                .locations
                .get_all()
                .await
                .map_err(map_service_error)?;
            Ok(Json(DeleteWithTableResponse::deleted(
                "Location deleted successfully",
                rows,
            )))
        }
        Err(err) => match client_message(&err) {
            Some(message) => Ok(Json(DeleteWithTableResponse::rejected(message))),
            None => Err(map_service_error(err)),
        },
    }
}

async fn country_dropdown(state: &AppState) -> Result<Vec<DropdownOption>, ApiError> {
    let countries = state
        .services
        .countries
        .get_all()
        .await
        .map_err(map_service_error)?;

    Ok(countries
        .into_iter()
        .map(|c| DropdownOption {
            id: c.id,
            display_text: c.name,
        })
        .collect())
}
