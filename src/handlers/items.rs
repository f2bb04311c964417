use crate::auth::{AuthRouterExt, AuthenticatedUser};
use crate::entities::item;
use crate::errors::ApiError;
use crate::handlers::common::{
    client_message, effective_id, map_service_error, success_response, validation_messages,
    DeleteResponse, DropdownOption, FormQuery, SaveResponse,
};
use crate::services::items::{ItemInput, ItemRow};
use crate::{ApiResponse, AppState};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Creates the router for item endpoints (Admin or SuperAdmin)
pub fn items_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items))
        .route("/form", get(item_form))
        .route("/save/:id", post(save_item))
        .route("/delete/:id", post(delete_item))
        .with_roles("Admin,SuperAdmin")
}

/// Prefilled item form payload with dropdowns
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemFormResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub item_status_id: i32,
    pub code: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub stock: Option<i32>,
    pub pharmacy_id: i32,
    pub available_item_statuses: Vec<DropdownOption>,
    pub available_pharmacies: Vec<DropdownOption>,
}

/// Posted item form fields
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveItemRequest {
    #[serde(default)]
    pub id: i32,
    #[validate(length(min = 1, max = 100, message = "Item name is required"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    pub price: Decimal,
    pub item_status_id: i32,
    #[validate(length(max = 50, message = "Item code cannot exceed 50 characters"))]
    pub code: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub stock: Option<i32>,
    pub pharmacy_id: i32,
}

fn default_true() -> bool {
    true
}

impl SaveItemRequest {
    fn into_input(self) -> ItemInput {
        ItemInput {
            name: self.name,
            description: self.description,
            price: self.price,
            item_status_id: self.item_status_id,
            code: self.code,
            expiry_date: self.expiry_date,
            is_active: self.is_active,
            stock: self.stock,
            pharmacy_id: self.pharmacy_id,
        }
    }
}

/// List all items with status and pharmacy names
#[utoipa::path(
    get,
    path = "/api/v1/items",
    responses(
        (status = 200, description = "Item table", body = crate::ApiResponse<Vec<ItemRow>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Items"
)]
pub async fn list_items(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = state
        .services
        .items
        .get_all()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ApiResponse::success(items)))
}

/// Blank or prefilled item form payload
#[utoipa::path(
    get,
    path = "/api/v1/items/form",
    params(FormQuery),
    responses(
        (status = 200, description = "Form payload", body = crate::ApiResponse<ItemFormResponse>),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Items"
)]
pub async fn item_form(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let available_item_statuses = item_status_dropdown(&state).await?;
    let available_pharmacies = pharmacy_dropdown(&state).await?;

    if query.id == 0 {
        return Ok(success_response(ApiResponse::success(ItemFormResponse {
            id: 0,
            name: String::new(),
            description: None,
            price: Decimal::ZERO,
            item_status_id: 0,
            code: None,
            expiry_date: None,
            is_active: true,
            stock: None,
            pharmacy_id: 0,
            available_item_statuses,
            available_pharmacies,
        })));
    }

    let item = state
        .services
        .items
        .get_by_id(query.id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ApiResponse::success(form_from_model(
        item,
        available_item_statuses,
        available_pharmacies,
    ))))
}

/// Create or update an item. The posted body's id wins when non-zero,
/// else the route id is used. The caller's identity is stamped into the
/// audit columns.
#[utoipa::path(
    post,
    path = "/api/v1/items/save/:id",
    request_body = SaveItemRequest,
    responses(
        (status = 200, description = "Save outcome", body = SaveResponse),
        (status = 500, description = "Unexpected failure", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Items"
)]
pub async fn save_item(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(route_id): Path<i32>,
    Json(payload): Json<SaveItemRequest>,
) -> Result<Json<SaveResponse>, ApiError> {
    if let Some(errors) = validation_messages(&payload) {
        return Ok(Json(SaveResponse::invalid(errors)));
    }

    let id = effective_id(route_id, payload.id);
    let input = payload.into_input();
    let user_name = caller_name(&user);

    let (result, message) = if id == 0 {
        (
            state.services.items.create(input, &user_name).await,
            "Item added successfully!",
        )
    } else {
        (
            state.services.items.update(id, input, &user_name).await,
            "Item updated successfully!",
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

/// Delete an item
#[utoipa::path(
    post,
    path = "/api/v1/items/delete/:id",
    responses(
        (status = 200, description = "Delete outcome", body = DeleteResponse),
        (status = 500, description = "Unexpected failure", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteResponse>, ApiError> {
    match state.services.items.delete(id).await {
        Ok(()) => Ok(Json(DeleteResponse::deleted("Item deleted successfully!"))),
        Err(err) => match client_message(&err) {
            Some(message) => Ok(Json(DeleteResponse::rejected(message))),
            None => Err(map_service_error(err)),
        },
    }
}

/// The audit identity: email when present, falling back to the display
/// name, then "System"
fn caller_name(user: &AuthenticatedUser) -> String {
    user.email
        .clone()
        .or_else(|| user.name.clone())
        .unwrap_or_else(|| "System".to_string())
}

fn form_from_model(
    item: item::Model,
    available_item_statuses: Vec<DropdownOption>,
    available_pharmacies: Vec<DropdownOption>,
) -> ItemFormResponse {
    ItemFormResponse {
        id: item.id,
        name: item.name,
        description: item.description,
        price: item.price,
        item_status_id: item.item_status_id,
        code: item.code,
        expiry_date: item.expiry_date,
        is_active: item.is_active,
        stock: item.stock,
        pharmacy_id: item.pharmacy_id,
        available_item_statuses,
        available_pharmacies,
    }
}

async fn item_status_dropdown(state: &AppState) -> Result<Vec<DropdownOption>, ApiError> {
    let statuses = state
        .services
        .item_statuses
        .get_all()
        .await
        .map_err(map_service_error)?;

    Ok(statuses
        .into_iter()
        .map(|s| DropdownOption {
            id: s.id,
            display_text: s.status,
        })
        .collect())
}

async fn pharmacy_dropdown(state: &AppState) -> Result<Vec<DropdownOption>, ApiError> {
    let pharmacies = state
        .services
        .pharmacies
        .get_all()
        .await
        .map_err(map_service_error)?;

    Ok(pharmacies
        .into_iter()
        .map(|p| DropdownOption {
            id: p.id,
            display_text: p.name,
        })
        .collect())
}
