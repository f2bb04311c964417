mod common;

use assert_matches::assert_matches;
use common::TestApp;
use pharmacy_api::errors::ServiceError;
use pharmacy_api::services::items::ItemInput;
use pharmacy_api::services::pharmacies::PharmacyInput;
use rust_decimal_macros::dec;

/// Seed the status and pharmacy rows an item needs
async fn fixtures(app: &TestApp) -> (i32, i32) {
    let status = app
        .state
        .services
        .item_statuses
        .create("In Stock")
        .await
        .expect("status create failed");

    let pharmacy = app
        .state
        .services
        .pharmacies
        .create(PharmacyInput {
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
        .expect("pharmacy create failed");

    (status.id, pharmacy.id)
}

fn input(name: &str, item_status_id: i32, pharmacy_id: i32) -> ItemInput {
    ItemInput {
        name: name.into(),
        description: Some("Pain relief".into()),
        price: dec!(9.99),
        item_status_id,
        code: Some("ASP-100".into()),
        expiry_date: None,
        is_active: true,
        stock: Some(50),
        pharmacy_id,
    }
}

#[tokio::test]
async fn create_stamps_insert_audit_fields() {
    let app = TestApp::new().await;
    let (status_id, pharmacy_id) = fixtures(&app).await;

    let created = app
        .state
        .services
        .items
        .create(input("Aspirin", status_id, pharmacy_id), "admin@example.com")
        .await
        .expect("create failed");

    assert_eq!(created.inserted_by.as_deref(), Some("admin@example.com"));
    assert!(created.insert_date.is_some());
    assert!(created.updated_by.is_none());
    assert!(created.update_date.is_none());
}

#[tokio::test]
async fn name_exists_honours_exclude_id() {
    let app = TestApp::new().await;
    let (status_id, pharmacy_id) = fixtures(&app).await;
    let items = &app.state.services.items;

    let aspirin = items
        .create(input("Aspirin", status_id, pharmacy_id), "seed")
        .await
        .unwrap();

    // The only row named Aspirin is the excluded one
    assert!(!items
        .name_exists("Aspirin", Some(aspirin.id))
        .await
        .unwrap());
    assert!(items.name_exists("Aspirin", None).await.unwrap());
    assert!(items.name_exists("aspirin", None).await.unwrap());

    items
        .create(input("Ibuprofen", status_id, pharmacy_id), "seed")
        .await
        .unwrap();
    assert!(items
        .name_exists("ibuprofen", Some(aspirin.id))
        .await
        .unwrap());
}

#[tokio::test]
async fn duplicate_name_is_rejected_on_create_and_update() {
    let app = TestApp::new().await;
    let (status_id, pharmacy_id) = fixtures(&app).await;
    let items = &app.state.services.items;

    let aspirin = items
        .create(input("Aspirin", status_id, pharmacy_id), "seed")
        .await
        .unwrap();

    assert_matches!(
        items
            .create(input("ASPIRIN", status_id, pharmacy_id), "seed")
            .await
            .unwrap_err(),
        ServiceError::Conflict(_)
    );

    let ibuprofen = items
        .create(input("Ibuprofen", status_id, pharmacy_id), "seed")
        .await
        .unwrap();

    // Renaming onto another row fails; renaming onto itself is fine
    assert_matches!(
        items
            .update(ibuprofen.id, input("aspirin", status_id, pharmacy_id), "seed")
            .await
            .unwrap_err(),
        ServiceError::Conflict(_)
    );
    items
        .update(aspirin.id, input("Aspirin", status_id, pharmacy_id), "seed")
        .await
        .expect("self-rename should succeed");
}

#[tokio::test]
async fn update_stamps_update_audit_and_preserves_insert_audit() {
    let app = TestApp::new().await;
    let (status_id, pharmacy_id) = fixtures(&app).await;
    let items = &app.state.services.items;

    let created = items
        .create(input("Aspirin", status_id, pharmacy_id), "creator@example.com")
        .await
        .unwrap();

    let mut changed = input("Aspirin Forte", status_id, pharmacy_id);
    changed.stock = Some(10);
    let updated = items
        .update(created.id, changed, "editor@example.com")
        .await
        .unwrap();

    assert_eq!(updated.name, "Aspirin Forte");
    assert_eq!(updated.stock, Some(10));
    assert_eq!(updated.inserted_by.as_deref(), Some("creator@example.com"));
    assert_eq!(updated.insert_date, created.insert_date);
    assert_eq!(updated.updated_by.as_deref(), Some("editor@example.com"));
    assert!(updated.update_date.is_some());
}

#[tokio::test]
async fn price_and_stock_bounds_are_enforced() {
    let app = TestApp::new().await;
    let (status_id, pharmacy_id) = fixtures(&app).await;
    let items = &app.state.services.items;

    let mut free = input("Freebie", status_id, pharmacy_id);
    free.price = dec!(0);
    assert_matches!(
        items.create(free, "seed").await.unwrap_err(),
        ServiceError::ValidationError(_)
    );

    let mut negative_stock = input("Shrinkage", status_id, pharmacy_id);
    negative_stock.stock = Some(-1);
    assert_matches!(
        items.create(negative_stock, "seed").await.unwrap_err(),
        ServiceError::ValidationError(_)
    );
}

#[tokio::test]
async fn list_rows_carry_display_names() {
    let app = TestApp::new().await;
    let (status_id, pharmacy_id) = fixtures(&app).await;

    app.state
        .services
        .items
        .create(input("Aspirin", status_id, pharmacy_id), "seed")
        .await
        .unwrap();

    let rows = app.state.services.items.get_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].item_status_name, "In Stock");
    assert_eq!(rows[0].pharmacy_name, "Central Pharmacy");
}

#[tokio::test]
async fn delete_missing_item_reports_not_found() {
    let app = TestApp::new().await;

    let err = app.state.services.items.delete(555).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}
