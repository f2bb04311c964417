mod common;

use assert_matches::assert_matches;
use common::TestApp;
use pharmacy_api::errors::ServiceError;

#[tokio::test]
async fn create_update_and_search() {
    let app = TestApp::new().await;
    let statuses = &app.state.services.item_statuses;

    let created = statuses.create("In Stock").await.expect("create failed");
    statuses.create("Discontinued").await.unwrap();

    let updated = statuses.update(created.id, "Backordered").await.unwrap();
    assert_eq!(updated.status, "Backordered");

    let hits = statuses.search_by_status("Back").await.unwrap();
    assert_eq!(hits.len(), 1);

    let all = statuses.search_by_status(" ").await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn status_text_is_validated() {
    let app = TestApp::new().await;
    let statuses = &app.state.services.item_statuses;

    assert_matches!(
        statuses.create("").await.unwrap_err(),
        ServiceError::ValidationError(_)
    );
    assert_matches!(
        statuses.create(&"s".repeat(101)).await.unwrap_err(),
        ServiceError::ValidationError(_)
    );
}

#[tokio::test]
async fn delete_missing_status_reports_not_found() {
    let app = TestApp::new().await;
    let statuses = &app.state.services.item_statuses;

    assert_matches!(
        statuses.delete(987).await.unwrap_err(),
        ServiceError::NotFound(_)
    );

    let created = statuses.create("Temp").await.unwrap();
    assert!(statuses.exists(created.id).await.unwrap());

    statuses.delete(created.id).await.expect("delete failed");
    assert!(!statuses.exists(created.id).await.unwrap());
    assert_matches!(
        statuses.get_by_id(created.id).await.unwrap_err(),
        ServiceError::NotFound(_)
    );
}
