mod common;

use assert_matches::assert_matches;
use common::TestApp;
use pharmacy_api::errors::ServiceError;
use pharmacy_api::services::locations::LocationInput;

fn input(country_id: i32) -> LocationInput {
    LocationInput {
        street: "1 High Street".into(),
        city: "Lisbon".into(),
        state: None,
        country_id,
        time_zone: Some("Europe/Lisbon".into()),
    }
}

#[tokio::test]
async fn create_with_unknown_country_inserts_nothing() {
    let app = TestApp::new().await;
    let locations = &app.state.services.locations;

    let err = locations.create(input(4242)).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(msg) if msg == "Invalid country specified");

    let all = locations.get_all().await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn create_and_list_carries_country_name() {
    let app = TestApp::new().await;
    let country = app
        .state
        .services
        .countries
        .create("Portugal")
        .await
        .unwrap();

    let created = app
        .state
        .services
        .locations
        .create(input(country.id))
        .await
        .expect("create failed");
    assert!(created.id > 0);

    let rows = app.state.services.locations.get_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].country_name, "Portugal");
    assert_eq!(rows[0].city, "Lisbon");
}

#[tokio::test]
async fn field_validation_rules() {
    let app = TestApp::new().await;
    let country = app.state.services.countries.create("Spain").await.unwrap();
    let locations = &app.state.services.locations;

    let mut missing_street = input(country.id);
    missing_street.street = "  ".into();
    assert_matches!(
        locations.create(missing_street).await.unwrap_err(),
        ServiceError::ValidationError(_)
    );

    let mut long_city = input(country.id);
    long_city.city = "c".repeat(101);
    assert_matches!(
        locations.create(long_city).await.unwrap_err(),
        ServiceError::ValidationError(_)
    );

    let mut long_tz = input(country.id);
    long_tz.time_zone = Some("t".repeat(51));
    assert_matches!(
        locations.create(long_tz).await.unwrap_err(),
        ServiceError::ValidationError(_)
    );

    let mut bad_country = input(0);
    bad_country.country_id = 0;
    assert_matches!(
        locations.create(bad_country).await.unwrap_err(),
        ServiceError::ValidationError(_)
    );
}

#[tokio::test]
async fn update_preserves_created_at_and_checks_country() {
    let app = TestApp::new().await;
    let country = app.state.services.countries.create("Italy").await.unwrap();
    let locations = &app.state.services.locations;

    let created = locations.create(input(country.id)).await.unwrap();

    let mut changed = input(country.id);
    changed.city = "Rome".into();
    let updated = locations.update(created.id, changed).await.unwrap();

    assert_eq!(updated.city, "Rome");
    assert_eq!(updated.created_at, created.created_at);

    let mut dangling = input(9999);
    dangling.city = "Nowhere".into();
    assert_matches!(
        locations.update(created.id, dangling).await.unwrap_err(),
        ServiceError::InvalidInput(_)
    );
}

#[tokio::test]
async fn get_by_country_requires_existing_country() {
    let app = TestApp::new().await;
    let locations = &app.state.services.locations;

    assert_matches!(
        locations.get_by_country(404).await.unwrap_err(),
        ServiceError::NotFound(_)
    );

    let country = app.state.services.countries.create("France").await.unwrap();
    locations.create(input(country.id)).await.unwrap();

    let rows = locations.get_by_country(country.id).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn search_by_city_filters_and_blank_returns_all() {
    let app = TestApp::new().await;
    let country = app.state.services.countries.create("Chile").await.unwrap();
    let locations = &app.state.services.locations;

    let mut santiago = input(country.id);
    santiago.city = "Santiago".into();
    locations.create(santiago).await.unwrap();

    let mut valparaiso = input(country.id);
    valparaiso.city = "Valparaiso".into();
    locations.create(valparaiso).await.unwrap();

    let hits = locations.search_by_city("Sant").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].city, "Santiago");

    let all = locations.search_by_city("").await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn delete_missing_location_reports_not_found() {
    let app = TestApp::new().await;
    let locations = &app.state.services.locations;

    let err = locations.delete(1234).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let country = app.state.services.countries.create("Norway").await.unwrap();
    let created = locations.create(input(country.id)).await.unwrap();
    assert!(locations.exists(created.id).await.unwrap());

    locations.delete(created.id).await.expect("delete failed");
    assert!(!locations.exists(created.id).await.unwrap());
}
