use nido::models::activity::ActivityType;
use nido::services::activity_service::{
    ActivityServiceError, CreateActivityRequest, UpdateActivityRequest,
};
use nido::test_utils::test_helpers::create_test_state;

fn create_request(activity_type: &str, timestamp: &str) -> CreateActivityRequest {
    CreateActivityRequest {
        activity_type: activity_type.to_string(),
        details: "bottle, 120ml".to_string(),
        baby_name: Some("Luna".to_string()),
        timestamp: Some(timestamp.to_string()),
    }
}

#[tokio::test]
async fn test_create_and_list() {
    let (state, _store) = create_test_state();

    state
        .activity_service
        .create("ana@x.com", create_request("feeding", "2026-02-01T10:00:00Z"))
        .await
        .unwrap();
    state
        .activity_service
        .create("ana@x.com", create_request("sleep", "2026-02-01T12:00:00Z"))
        .await
        .unwrap();
    state
        .activity_service
        .create("bo@x.com", create_request("diaper", "2026-02-01T13:00:00Z"))
        .await
        .unwrap();

    let listed = state.activity_service.list("ana@x.com").await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].activity_type, ActivityType::Feeding);
}

#[tokio::test]
async fn test_update_by_original_timestamp_after_rewrite() {
    let (state, _store) = create_test_state();
    state
        .activity_service
        .create("ana@x.com", create_request("feeding", "2026-02-01T10:00:00Z"))
        .await
        .unwrap();

    // Rewrite the timestamp, locating the row by its pre-edit value.
    state
        .activity_service
        .update(
            "ana@x.com",
            "2026-02-01T10:00:00Z",
            UpdateActivityRequest {
                timestamp: Some("2026-02-01T11:30:00Z".to_string()),
                details: Some("breast, 15min".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Identity has moved with the cell: the old key no longer resolves...
    let stale = state
        .activity_service
        .update(
            "ana@x.com",
            "2026-02-01T10:00:00Z",
            UpdateActivityRequest {
                details: Some("anything".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(stale, Err(ActivityServiceError::ActivityNotFound)));

    // ...and the new key does.
    state
        .activity_service
        .update(
            "ana@x.com",
            "2026-02-01T11:30:00Z",
            UpdateActivityRequest {
                details: Some("breast, 20min".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listed = state.activity_service.list("ana@x.com").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].timestamp, "2026-02-01T11:30:00Z");
    assert_eq!(listed[0].details, "breast, 20min");
}

#[tokio::test]
async fn test_update_does_not_touch_other_users_rows() {
    let (state, _store) = create_test_state();
    state
        .activity_service
        .create("ana@x.com", create_request("feeding", "2026-02-01T10:00:00Z"))
        .await
        .unwrap();
    state
        .activity_service
        .create("bo@x.com", create_request("feeding", "2026-02-01T10:00:00Z"))
        .await
        .unwrap();

    state
        .activity_service
        .update(
            "ana@x.com",
            "2026-02-01T10:00:00Z",
            UpdateActivityRequest {
                details: Some("changed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let bo = state.activity_service.list("bo@x.com").await.unwrap();
    assert_eq!(bo[0].details, "bottle, 120ml");
}

#[tokio::test]
async fn test_delete_requires_exact_timestamp() {
    let (state, _store) = create_test_state();
    state
        .activity_service
        .create("ana@x.com", create_request("milestone", "2026-02-01T10:00:00Z"))
        .await
        .unwrap();

    let miss = state
        .activity_service
        .delete("ana@x.com", "2026-02-01T10:00:00.000Z")
        .await;
    assert!(matches!(miss, Err(ActivityServiceError::ActivityNotFound)));

    state
        .activity_service
        .delete("ana@x.com", "2026-02-01T10:00:00Z")
        .await
        .unwrap();
    assert!(state.activity_service.list("ana@x.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_key_first_row_wins() {
    // The store enforces no uniqueness on (user, timestamp); sheet order
    // decides which row an update hits.
    let (state, _store) = create_test_state();
    for details in ["first", "second"] {
        state
            .activity_service
            .create(
                "ana@x.com",
                CreateActivityRequest {
                    activity_type: "feeding".to_string(),
                    details: details.to_string(),
                    baby_name: None,
                    timestamp: Some("2026-02-01T10:00:00Z".to_string()),
                },
            )
            .await
            .unwrap();
    }

    state
        .activity_service
        .update(
            "ana@x.com",
            "2026-02-01T10:00:00Z",
            UpdateActivityRequest {
                details: Some("updated".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listed = state.activity_service.list("ana@x.com").await.unwrap();
    assert_eq!(listed[0].details, "updated");
    assert_eq!(listed[1].details, "second");
}
