use crate::auth::AuthRouterExt;
use crate::entities::item_status;
use crate::errors::ApiError;
use crate::handlers::common::{
    client_message, effective_id, map_service_error, success_response, validation_messages,
    DeleteResponse, FormQuery, SaveResponse,
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

/// Creates the router for item status endpoints (Admin or SuperAdmin)
pub fn item_statuses_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_item_statuses))
        .route("/form", get(item_status_form))
        .route("/save/:id", post(save_item_status))
        .route("/delete/:id", post(delete_item_status))
        .with_roles("Admin,SuperAdmin")
}

/// Item status table row
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemStatusResponse {
    pub id: i32,
    pub status: String,
}

impl From<item_status::Model> for ItemStatusResponse {
    fn from(model: item_status::Model) -> Self {
        Self {
            id: model.id,
            status: model.status,
        }
    }
}

/// Posted item status form fields
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveItemStatusRequest {
    #[serde(default)]
    pub id: i32,
    #[validate(length(min = 1, max = 100, message = "Status is required"))]
    pub status: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ItemStatusSearchQuery {
    pub status: Option<String>,
}

/// List all item statuses, optionally filtered by status text
#[utoipa::path(
    get,
    path = "/api/v1/item-statuses",
    params(ItemStatusSearchQuery),
    responses(
        (status = 200, description = "Item status table", body = crate::ApiResponse<Vec<ItemStatusResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "ItemStatuses"
)]
pub async fn list_item_statuses(
    State(state): State<AppState>,
    Query(search): Query<ItemStatusSearchQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let statuses = match search.status.as_deref() {
        Some(status) => state.services.item_statuses.search_by_status(status).await,
        None => state.services.item_statuses.get_all().await,
    }
    .map_err(map_service_error)?;

    let rows: Vec<ItemStatusResponse> = statuses.into_iter().map(Into::into).collect();
    Ok(success_response(ApiResponse::success(rows)))
}

/// Blank or prefilled item status form payload
#[utoipa::path(
    get,
    path = "/api/v1/item-statuses/form",
    params(FormQuery),
    responses(
        (status = 200, description = "Form payload", body = crate::ApiResponse<ItemStatusResponse>),
        (status = 404, description = "Item status not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "ItemStatuses"
)]
pub async fn item_status_form(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    if query.id == 0 {
        return Ok(success_response(ApiResponse::success(
            ItemStatusResponse {
                id: 0,
                status: String::new(),
            },
        )));
    }

    let status = state
        .services
        .item_statuses
        .get_by_id(query.id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ApiResponse::success(
        ItemStatusResponse::from(status),
    )))
}

/// Create or update an item status. The posted body's id wins when
/// non-zero, else the route id is used.
#[utoipa::path(
    post,
    path = "/api/v1/item-statuses/save/:id",
    request_body = SaveItemStatusRequest,
    responses(
        (status = 200, description = "Save outcome", body = SaveResponse),
        (status = 500, description = "Unexpected failure", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "ItemStatuses"
)]
pub async fn save_item_status(
    State(state): State<AppState>,
    Path(route_id): Path<i32>,
    Json(payload): Json<SaveItemStatusRequest>,
) -> Result<Json<SaveResponse>, ApiError> {
    if let Some(errors) = validation_messages(&payload) {
        return Ok(Json(SaveResponse::invalid(errors)));
    }

    let id = effective_id(route_id, payload.id);

    let (result, message) = if id == 0 {
        (
            state.services.item_statuses.create(&payload.status).await,
            "Item status added successfully!",
        )
    } else {
        (
            state
                .services
                .item_statuses
                .update(id, &payload.status)
                .await,
            "Item status updated successfully!",
        )
    };

    match result {
        Ok(_) => Ok(Json(SaveResponse::saved(message))),
        Err(err) => match client_message(&err) {
            Some(message) => Ok(Json(SaveResponse::rejected(message))),
            None => Err(map_service_error(err)),
        },
    }
}

/// Delete an item status
#[utoipa::path(
    post,
    path = "/api/v1/item-statuses/delete/:id",
    responses(
        (status = 200, description = "Delete outcome", body = DeleteResponse),
        (status = 500, description = "Unexpected failure", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "ItemStatuses"
)]
pub async fn delete_item_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteResponse>, ApiError> {
    match state.services.item_statuses.delete(id).await {
        Ok(()) => Ok(Json(DeleteResponse::deleted(
            "Item status deleted successfully!",
        ))),
        Err(err) => match client_message(&err) {
            Some(message) => Ok(Json(DeleteResponse::rejected(message))),
            None => Err(map_service_error(err)),
        },
    }
}
