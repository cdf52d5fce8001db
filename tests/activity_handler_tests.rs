mod common;

use axum::http::StatusCode;
use common::{authed_json_request, authed_request, login, read_json, send};
use nido::test_utils::test_helpers::{create_test_state, insert_test_user};
use serde_json::json;

#[tokio::test]
async fn test_create_update_delete_with_encoded_timestamp_path() {
    let (state, store) = create_test_state();
    insert_test_user(&store, "ana@x.com", "secret1", false, false)
        .await
        .unwrap();
    let app = nido::app(state);
    let cookie = login(&app, "ana@x.com", "secret1").await;

    let response = send(
        &app,
        authed_json_request(
            "POST",
            "/activities",
            json!({
                "type": "feeding",
                "details": "bottle, 120ml",
                "timestamp": "2026-02-01T10:00:00+00:00",
            }),
            &cookie,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The RFC 3339 timestamp carries ':' and '+', so it travels
    // percent-encoded in the path and is decoded before lookup.
    let encoded = urlencoding::encode("2026-02-01T10:00:00+00:00");
    let response = send(
        &app,
        authed_json_request(
            "PUT",
            &format!("/activities/{}", encoded),
            json!({ "details": "bottle, 150ml" }),
            &cookie,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, authed_request("GET", "/activities", &cookie)).await;
    let body = read_json(response).await;
    let activities = body["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["details"], "bottle, 150ml");

    let response = send(
        &app,
        authed_request("DELETE", &format!("/activities/{}", encoded), &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, authed_request("GET", "/activities", &cookie)).await;
    let body = read_json(response).await;
    assert!(body["activities"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_activity_type_is_400() {
    let (state, store) = create_test_state();
    insert_test_user(&store, "ana@x.com", "secret1", false, false)
        .await
        .unwrap();
    let app = nido::app(state);
    let cookie = login(&app, "ana@x.com", "secret1").await;

    let response = send(
        &app,
        authed_json_request(
            "POST",
            "/activities",
            json!({ "type": "screaming", "details": "loud" }),
            &cookie,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Unknown activity type: screaming");
}

#[tokio::test]
async fn test_empty_update_body_is_400() {
    let (state, store) = create_test_state();
    insert_test_user(&store, "ana@x.com", "secret1", false, false)
        .await
        .unwrap();
    let app = nido::app(state);
    let cookie = login(&app, "ana@x.com", "secret1").await;

    let response = send(
        &app,
        authed_json_request(
            "PUT",
            "/activities/2026-02-01T10%3A00%3A00Z",
            json!({}),
            &cookie,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "No fields to update");
}

#[tokio::test]
async fn test_update_of_missing_activity_is_500() {
    // Store misses are a generic failure, never a 404.
    let (state, store) = create_test_state();
    insert_test_user(&store, "ana@x.com", "secret1", false, false)
        .await
        .unwrap();
    let app = nido::app(state);
    let cookie = login(&app, "ana@x.com", "secret1").await;

    let response = send(
        &app,
        authed_json_request(
            "PUT",
            "/activities/2026-02-01T10%3A00%3A00Z",
            json!({ "details": "anything" }),
            &cookie,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
