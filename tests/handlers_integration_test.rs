mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use pharmacy_api::auth::roles;
use serde_json::json;

async fn admin_token(app: &TestApp) -> String {
    app.seed_user("Admin User", "admin@example.com", "s3cret-pass", roles::ADMIN)
        .await;
    app.token_for("admin@example.com").await
}

#[tokio::test]
async fn entity_routes_reject_anonymous_callers() {
    let app = TestApp::new().await;

    for uri in [
        "/api/v1/countries",
        "/api/v1/locations",
        "/api/v1/item-statuses",
        "/api/v1/pharmacies",
        "/api/v1/items",
    ] {
        let (status, _) = app.request(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "expected 401 for {uri}");
    }
}

#[tokio::test]
async fn role_gates_follow_the_per_entity_matrix() {
    let app = TestApp::new().await;

    app.seed_user("Plain User", "user@example.com", "s3cret-pass", roles::USER)
        .await;
    let user_token = app.token_for("user@example.com").await;

    app.seed_user(
        "Super Admin",
        "super@example.com",
        "s3cret-pass",
        roles::SUPER_ADMIN,
    )
    .await;
    let super_token = app.token_for("super@example.com").await;

    let admin = admin_token(&app).await;

    // Plain users reach locations but nothing role-gated
    let (status, _) = app
        .request(Method::GET, "/api/v1/locations", Some(&user_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .request(Method::GET, "/api/v1/countries", Some(&user_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .request(Method::GET, "/api/v1/items", Some(&user_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // SuperAdmin passes the Admin-or-SuperAdmin gates but not the
    // Admin-only ones
    let (status, _) = app
        .request(Method::GET, "/api/v1/item-statuses", Some(&super_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .request(Method::GET, "/api/v1/countries", Some(&super_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin passes both
    let (status, _) = app
        .request(Method::GET, "/api/v1/countries", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .request(Method::GET, "/api/v1/items", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn save_creates_when_effective_id_is_zero() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/countries/save/0",
            Some(&token),
            Some(json!({"id": 0, "name": "Canada"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], true);
    assert_eq!(body["message"], "Country added successfully");
    assert_eq!(body["rows"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn posted_body_id_wins_over_route_id() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let created = app
        .state
        .services
        .countries
        .create("Canada")
        .await
        .unwrap();

    // Route says 0 (create) but the body names an existing row: this must
    // be an update of that row, not an insert
    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/countries/save/0",
            Some(&token),
            Some(json!({"id": created.id, "name": "Canadia"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], true);
    assert_eq!(body["message"], "Country updated successfully");

    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Canadia");
}

#[tokio::test]
async fn validation_failure_is_a_200_with_the_failure_flag() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/countries/save/0",
            Some(&token),
            Some(json!({"id": 0, "name": ""})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], false);
    assert!(body["errors"].as_array().is_some());
}

#[tokio::test]
async fn duplicate_name_failure_is_a_200_with_a_message() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    app.state
        .services
        .countries
        .create("Canada")
        .await
        .unwrap();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/countries/save/0",
            Some(&token),
            Some(json!({"id": 0, "name": "canada"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn deleting_a_missing_row_reports_failure_without_an_error_status() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/countries/delete/9999",
            Some(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/items/delete/9999",
            Some(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn country_delete_blocked_by_locations_returns_conflict_message() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let country = app
        .state
        .services
        .countries
        .create("Canada")
        .await
        .unwrap();
    app.state
        .services
        .locations
        .create(pharmacy_api::services::locations::LocationInput {
            street: "12 Main St".into(),
            city: "Toronto".into(),
            state: None,
            country_id: country.id,
            time_zone: None,
        })
        .await
        .unwrap();

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/v1/countries/delete/{}", country.id),
            Some(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("associated locations"));
}

#[tokio::test]
async fn item_save_uses_the_plain_success_envelope() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let status_row = app
        .state
        .services
        .item_statuses
        .create("In Stock")
        .await
        .unwrap();
    let pharmacy = app
        .state
        .services
        .pharmacies
        .create(pharmacy_api::services::pharmacies::PharmacyInput {
            name: "Central Pharmacy".into(),
            username: "central@example.com".into(),
            password: None,
            latitude: None,
            longitude: None,
            is_active: true,
            user_id: None,
            account_number: None,
            location_id: None,
        })
        .await
        .unwrap();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/items/save/0",
            Some(&token),
            Some(json!({
                "id": 0,
                "name": "Aspirin",
                "description": "Pain relief",
                "price": 9.99,
                "item_status_id": status_row.id,
                "code": "ASP-100",
                "is_active": true,
                "stock": 50,
                "pharmacy_id": pharmacy.id
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Item added successfully!");
    // No table payload on the items envelope
    assert!(body.get("rows").is_none());

    // The audit stamp carries the caller's identity
    let rows = app.state.services.items.get_all().await.unwrap();
    assert_eq!(rows[0].inserted_by.as_deref(), Some("admin@example.com"));
}

#[tokio::test]
async fn pharmacy_listing_is_scoped_to_the_admin_caller() {
    let app = TestApp::new().await;

    // Two admins, one pharmacy each
    app.seed_user("Admin One", "one@example.com", "s3cret-pass", roles::ADMIN)
        .await;
    app.seed_user("Admin Two", "two@example.com", "s3cret-pass", roles::ADMIN)
        .await;

    for username in ["one@example.com", "two@example.com"] {
        app.state
            .services
            .pharmacies
            .create(pharmacy_api::services::pharmacies::PharmacyInput {
                name: format!("Pharmacy of {username}"),
                username: username.into(),
                password: None,
                latitude: None,
                longitude: None,
                is_active: true,
                user_id: None,
                account_number: None,
                location_id: None,
            })
            .await
            .unwrap();
    }

    let one_token = app.token_for("one@example.com").await;
    let (status, body) = app
        .request(Method::GET, "/api/v1/pharmacies", Some(&one_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["username"], "one@example.com");

    // A caller holding both Admin and SuperAdmin sees everything
    let super_id = app
        .seed_user("Root", "root@example.com", "s3cret-pass", roles::ADMIN)
        .await;
    app.auth_service
        .add_to_role(super_id, roles::SUPER_ADMIN)
        .await
        .unwrap();
    let root_token = app.token_for("root@example.com").await;

    let (status, body) = app
        .request(Method::GET, "/api/v1/pharmacies", Some(&root_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn form_endpoints_prefill_and_load_dropdowns() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let country = app
        .state
        .services
        .countries
        .create("Canada")
        .await
        .unwrap();

    // Blank form carries the dropdown data
    let (status, body) = app
        .request(
            Method::GET,
            "/api/v1/locations/form?id=0",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 0);
    assert_eq!(
        body["data"]["available_countries"].as_array().unwrap().len(),
        1
    );

    // Prefilled form echoes the row
    let location = app
        .state
        .services
        .locations
        .create(pharmacy_api::services::locations::LocationInput {
            street: "12 Main St".into(),
            city: "Toronto".into(),
            state: None,
            country_id: country.id,
            time_zone: None,
        })
        .await
        .unwrap();

    let (status, body) = app
        .request(
            Method::GET,
            &format!("/api/v1/locations/form?id={}", location.id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["city"], "Toronto");

    // Unknown ids are a hard 404 on the form path
    let (status, _) = app
        .request(
            Method::GET,
            "/api/v1/locations/form?id=9999",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
