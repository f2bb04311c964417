mod common;

use assert_matches::assert_matches;
use common::TestApp;
use pharmacy_api::auth::roles;
use pharmacy_api::errors::ServiceError;
use pharmacy_api::services::pharmacies::PharmacyInput;

fn input(name: &str, username: &str) -> PharmacyInput {
    PharmacyInput {
        name: name.into(),
        username: username.into(),
        password: None,
        latitude: None,
        longitude: None,
        is_active: true,
        user_id: None,
        account_number: Some("AC-100".into()),
        location_id: None,
    }
}

#[tokio::test]
async fn create_with_unknown_username_provisions_admin_user() {
    let app = TestApp::new().await;
    let pharmacies = &app.state.services.pharmacies;

    let created = pharmacies
        .create(input("Green Cross", "new@example.com"))
        .await
        .expect("create failed");

    // The identity account exists and is linked to the pharmacy row
    let user = app
        .auth_service
        .find_user_by_email("new@example.com")
        .await
        .unwrap()
        .expect("provisioned user should exist");
    assert_eq!(created.user_id, user.id);

    let user_roles = app.auth_service.get_user_roles(user.id).await.unwrap();
    assert!(user_roles.contains(&roles::ADMIN.to_string()));
}

#[tokio::test]
async fn create_with_known_username_links_existing_user() {
    let app = TestApp::new().await;
    let existing_id = app
        .seed_user("Maria Pineda", "maria@example.com", "s3cret-pass", roles::ADMIN)
        .await;

    let created = app
        .state
        .services
        .pharmacies
        .create(input("Pineda Pharmacy", "maria@example.com"))
        .await
        .unwrap();

    assert_eq!(created.user_id, existing_id);

    // No second account was created for the same email
    let users = app.auth_service.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn duplicate_pharmacy_name_is_rejected_case_insensitively() {
    let app = TestApp::new().await;
    let pharmacies = &app.state.services.pharmacies;

    pharmacies
        .create(input("Green Cross", "a@example.com"))
        .await
        .unwrap();

    let err = pharmacies
        .create(input("GREEN CROSS", "b@example.com"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn name_exists_excludes_given_row() {
    let app = TestApp::new().await;
    let pharmacies = &app.state.services.pharmacies;

    let created = pharmacies
        .create(input("Green Cross", "a@example.com"))
        .await
        .unwrap();

    assert!(pharmacies.name_exists("green cross", None).await.unwrap());
    assert!(!pharmacies
        .name_exists("green cross", Some(created.id))
        .await
        .unwrap());
    assert!(!pharmacies.name_exists("   ", None).await.unwrap());
}

#[tokio::test]
async fn update_overwrites_mutable_fields_and_stamps_updated_at() {
    let app = TestApp::new().await;
    let pharmacies = &app.state.services.pharmacies;

    let created = pharmacies
        .create(input("Green Cross", "a@example.com"))
        .await
        .unwrap();
    assert!(created.updated_at.is_none());

    let mut changed = input("Blue Cross", "a@example.com");
    changed.account_number = Some("AC-200".into());
    let updated = pharmacies.update(created.id, changed).await.unwrap();

    assert_eq!(updated.name, "Blue Cross");
    assert_eq!(updated.account_number.as_deref(), Some("AC-200"));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at.is_some());
    // Linked user is kept when none is posted
    assert_eq!(updated.user_id, created.user_id);
}

#[tokio::test]
async fn create_with_unknown_location_is_rejected() {
    let app = TestApp::new().await;

    let mut bad = input("Green Cross", "a@example.com");
    bad.location_id = Some(777);

    let err = app
        .state
        .services
        .pharmacies
        .create(bad)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));
}

#[tokio::test]
async fn delete_missing_pharmacy_reports_not_found() {
    let app = TestApp::new().await;

    let err = app
        .state
        .services
        .pharmacies
        .delete(4321)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
    assert!(!app.state.services.pharmacies.exists(4321).await.unwrap());
}

#[tokio::test]
async fn scoped_listing_returns_only_own_rows() {
    let app = TestApp::new().await;
    let pharmacies = &app.state.services.pharmacies;

    let own = pharmacies
        .create(input("Mine", "mine@example.com"))
        .await
        .unwrap();
    pharmacies
        .create(input("Theirs", "theirs@example.com"))
        .await
        .unwrap();

    let scoped = pharmacies.get_all_for_user(own.user_id).await.unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].name, "Mine");

    let all = pharmacies.get_all().await.unwrap();
    assert_eq!(all.len(), 2);
}
