use crate::auth::{roles, AuthRouterExt};
use crate::entities::country;
use crate::errors::ApiError;
use crate::handlers::common::{
    client_message, effective_id, map_service_error, success_response, validation_messages,
    DeleteWithTableResponse, FormQuery, SaveWithTableResponse,
};
use crate::{ApiResponse, AppState};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Creates the router for country endpoints (Admin only)
pub fn countries_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_countries))
        .route("/form", get(country_form))
        .route("/save/:id", post(save_country))
        .route("/delete/:id", post(delete_country))
        .with_roles(roles::ADMIN)
}

/// Country table row
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CountryResponse {
    pub id: i32,
    pub name: String,
}

impl From<country::Model> for CountryResponse {
    fn from(model: country::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Posted country form fields
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveCountryRequest {
    #[serde(default)]
    pub id: i32,
    #[validate(length(min = 1, max = 100, message = "Country name is required"))]
    pub name: String,
}

/// List all countries
#[utoipa::path(
    get,
    path = "/api/v1/countries",
    responses(
        (status = 200, description = "Country table", body = crate::ApiResponse<Vec<CountryResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Countries"
)]
pub async fn list_countries(
    State(state): State<AppState>,
    Query(search): Query<CountrySearchQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let countries = match search.name.as_deref() {
        Some(name) => state.services.countries.search_by_name(name).await,
        None => state.services.countries.get_all().await,
    }
    .map_err(map_service_error)?;

    let rows: Vec<CountryResponse> = countries.into_iter().map(Into::into).collect();
    Ok(success_response(ApiResponse::success(rows)))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CountrySearchQuery {
    pub name: Option<String>,
}

/// Blank or prefilled country form payload
#[utoipa::path(
    get,
    path = "/api/v1/countries/form",
    params(FormQuery),
    responses(
        (status = 200, description = "Form payload", body = crate::ApiResponse<CountryResponse>),
        (status = 404, description = "Country not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Countries"
)]
pub async fn country_form(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    if query.id == 0 {
        return Ok(success_response(ApiResponse::success(CountryResponse {
            id: 0,
            name: String::new(),
        })));
    }

    let country = state
        .services
        .countries
        .get_by_id(query.id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ApiResponse::success(CountryResponse::from(
        country,
    ))))
}

/// Create or update a country. The posted body's id wins when non-zero,
/// else the route id is used.
#[utoipa::path(
    post,
    path = "/api/v1/countries/save/:id",
    request_body = SaveCountryRequest,
    responses(
        (status = 200, description = "Save outcome with refreshed table", body = SaveWithTableResponse<CountryResponse>),
        (status = 500, description = "Unexpected failure", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Countries"
)]
pub async fn save_country(
    State(state): State<AppState>,
    Path(route_id): Path<i32>,
    Json(payload): Json<SaveCountryRequest>,
) -> Result<Json<SaveWithTableResponse<CountryResponse>>, ApiError> {
    if let Some(errors) = validation_messages(&payload) {
        return Ok(Json(SaveWithTableResponse::invalid(errors)));
    }

    let id = effective_id(route_id, payload.id);

    let (result, message) = if id == 0 {
        (
            state.services.countries.create(&payload.name).await,
            "Country added successfully",
        )
    } else {
        (
            state.services.countries.update(id, &payload.name).await,
            "Country updated successfully",
        )
    };

    match result {
        Ok(_) => {
            let rows = refreshed_table(&state).await?;
            Ok(Json(SaveWithTableResponse::saved(message, rows)))
        }
        Err(err) => match client_message(&err) {
            Some(message) => Ok(Json(SaveWithTableResponse::rejected(message))),
            None => Err(map_service_error(err)),
        },
    }
}

/// Delete a country; blocked while locations reference it
#[utoipa::path(
    post,
    path = "/api/v1/countries/delete/:id",
    responses(
        (status = 200, description = "Delete outcome with refreshed table", body = DeleteWithTableResponse<CountryResponse>),
        (status = 500, description = "Unexpected failure", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Countries"
)]
pub async fn delete_country(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteWithTableResponse<CountryResponse>>, ApiError> {
    match state.services.countries.delete(id).await {
        Ok(()) => {
            let rows = refreshed_table(&state).await?;
            Ok(Json(DeleteWithTableResponse::deleted(
                "Country deleted successfully",
                rows,
            )))
        }
        Err(err) => match client_message(&err) {
            Some(message) => Ok(Json(DeleteWithTableResponse::rejected(message))),
            None => Err(map_service_error(err)),
        },
    }
}

async fn refreshed_table(state: &AppState) -> Result<Vec<CountryResponse>, ApiError> {
    let countries = state
        .services
        .countries
        .get_all()
        .await
        .map_err(map_service_error)?;
    Ok(countries.into_iter().map(Into::into).collect())
}
