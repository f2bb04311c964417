use crate::errors::{ApiError, ServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::ValidationError(format!("Validation failed: {}", e)))
}

/// Collect field-level validation messages for embedding in a form envelope
pub fn validation_messages<T: Validate>(input: &T) -> Option<Vec<String>> {
    match input.validate() {
        Ok(()) => None,
        Err(errors) => {
            let mut messages: Vec<String> = errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errs)| {
                    errs.iter().map(move |e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("{} is invalid", field),
                    })
                })
                .collect();
            messages.sort();
            Some(messages)
        }
    }
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

/// Failures the original surfaced inside the form envelope (HTTP 200 with
/// the failure flag) rather than as an error status. Infra errors return
/// `None` and should propagate to the 500 handler.
pub fn client_message(err: &ServiceError) -> Option<String> {
    match err {
        ServiceError::ValidationError(msg)
        | ServiceError::InvalidInput(msg)
        | ServiceError::InvalidOperation(msg)
        | ServiceError::NotFound(msg)
        | ServiceError::Conflict(msg) => Some(msg.clone()),
        _ => None,
    }
}

/// Query parameter selecting the row a form is prefilled from; 0 means a
/// blank form
#[derive(Debug, Deserialize, IntoParams)]
pub struct FormQuery {
    #[serde(default)]
    pub id: i32,
}

/// Dropdown option payload (id + display text)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DropdownOption {
    pub id: i32,
    pub display_text: String,
}

/// Dropdown option payload for identity users
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserOption {
    pub id: Uuid,
    pub display_text: String,
}

/// Save envelope for the entities whose save response embeds the refreshed
/// table (countries, locations, pharmacies)
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveWithTableResponse<T> {
    pub is_valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<T>>,
}

impl<T> SaveWithTableResponse<T> {
    pub fn saved(message: impl Into<String>, rows: Vec<T>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
            errors: None,
            rows: Some(rows),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
            errors: None,
            rows: None,
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            is_valid: false,
            message: "Validation failed".to_string(),
            errors: Some(errors),
            rows: None,
        }
    }
}

/// Save envelope for the entities whose save response carries no table
/// (items, item statuses)
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl SaveResponse {
    pub fn saved(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: "Validation failed".to_string(),
            errors: Some(errors),
        }
    }
}

/// Delete envelope embedding the refreshed table on success
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteWithTableResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<T>>,
}

impl<T> DeleteWithTableResponse<T> {
    pub fn deleted(message: impl Into<String>, rows: Vec<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            rows: Some(rows),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            rows: None,
        }
    }
}

/// Delete envelope without a table payload
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn deleted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Effective-id rule shared by every save endpoint: the posted body's id
/// wins when non-zero, else the route id is used
pub fn effective_id(route_id: i32, body_id: i32) -> i32 {
    if body_id != 0 {
        body_id
    } else {
        route_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_id_wins_when_nonzero() {
        assert_eq!(effective_id(0, 7), 7);
        assert_eq!(effective_id(3, 7), 7);
    }

    #[test]
    fn route_id_used_when_body_id_zero() {
        assert_eq!(effective_id(3, 0), 3);
        assert_eq!(effective_id(0, 0), 0);
    }

    #[test]
    fn client_message_covers_form_level_failures_only() {
        assert_eq!(
            client_message(&ServiceError::Conflict("dup".into())).as_deref(),
            Some("dup")
        );
        assert_eq!(
            client_message(&ServiceError::NotFound("gone".into())).as_deref(),
            Some("gone")
        );
        assert!(client_message(&ServiceError::InternalServerError).is_none());
        assert!(client_message(&ServiceError::db_error("boom")).is_none());
    }
}
