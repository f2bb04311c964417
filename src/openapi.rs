use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pharmacy API",
        version = "0.1.0",
        description = r#"
# Pharmacy Administration API

Role-gated management of countries, locations, pharmacies, items and item
statuses.

## Authentication

All entity endpoints require a JWT bearer token obtained from
`POST /auth/login` or `POST /auth/register`:

```
Authorization: Bearer <your-jwt-token>
```

Countries and Pharmacies require the Admin role; Items and ItemStatuses
require Admin or SuperAdmin; Locations require any signed-in user.

## Save semantics

`POST .../save/{id}` creates when the effective id is 0 and updates
otherwise; the posted body's id wins when non-zero. Validation and
conflict failures come back as HTTP 200 with the envelope's failure flag
set, mirroring in-page form handling.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Countries", description = "Country management endpoints"),
        (name = "Locations", description = "Location management endpoints"),
        (name = "ItemStatuses", description = "Item status lookup management"),
        (name = "Pharmacies", description = "Pharmacy management endpoints"),
        (name = "Items", description = "Item management endpoints"),
        (name = "Auth", description = "Login, registration and password reset")
    ),
    paths(
        // Countries
        crate::handlers::countries::list_countries,
        crate::handlers::countries::country_form,
        crate::handlers::countries::save_country,
        crate::handlers::countries::delete_country,

        // Locations
        crate::handlers::locations::list_locations,
        crate::handlers::locations::locations_by_country,
        crate::handlers::locations::location_form,
        crate::handlers::locations::save_location,
        crate::handlers::locations::delete_location,

        // Item statuses
        crate::handlers::item_statuses::list_item_statuses,
        crate::handlers::item_statuses::item_status_form,
        crate::handlers::item_statuses::save_item_status,
        crate::handlers::item_statuses::delete_item_status,

        // Pharmacies
        crate::handlers::pharmacies::list_pharmacies,
        crate::handlers::pharmacies::pharmacy_form,
        crate::handlers::pharmacies::save_pharmacy,
        crate::handlers::pharmacies::delete_pharmacy,

        // Items
        crate::handlers::items::list_items,
        crate::handlers::items::item_form,
        crate::handlers::items::save_item,
        crate::handlers::items::delete_item,

        // Auth
        crate::auth::login_handler,
        crate::auth::register_handler,
        crate::auth::logout_handler,
        crate::auth::verify_email_handler,
        crate::auth::change_password_handler,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::handlers::common::DropdownOption,
            crate::handlers::common::UserOption,
            crate::handlers::common::SaveResponse,
            crate::handlers::common::DeleteResponse,

            // Entity types
            crate::handlers::countries::CountryResponse,
            crate::handlers::countries::SaveCountryRequest,
            crate::services::locations::LocationRow,
            crate::handlers::locations::LocationFormResponse,
            crate::handlers::locations::SaveLocationRequest,
            crate::handlers::item_statuses::ItemStatusResponse,
            crate::handlers::item_statuses::SaveItemStatusRequest,
            crate::services::pharmacies::PharmacyRow,
            crate::handlers::pharmacies::PharmacyFormResponse,
            crate::handlers::pharmacies::SavePharmacyRequest,
            crate::services::items::ItemRow,
            crate::handlers::items::ItemFormResponse,
            crate::handlers::items::SaveItemRequest,

            // Auth types
            crate::auth::LoginRequest,
            crate::auth::RegisterRequest,
            crate::auth::VerifyEmailRequest,
            crate::auth::VerifyEmailResponse,
            crate::auth::ChangePasswordRequest,
            crate::auth::TokenResponse,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
