mod common;

use axum::http::StatusCode;
use common::{authed_json_request, json_request, login, read_json, send};
use nido::test_utils::test_helpers::{
    create_test_state_with_settings, insert_test_user, test_settings_with_payment_url,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_create_preference_returns_checkout_url() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/checkout/preferences"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({ "external_reference": "ana@x.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pref-123",
            "init_point": "https://provider.test/checkout/pref-123",
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let (state, store) =
        create_test_state_with_settings(test_settings_with_payment_url(&provider.uri()));
    insert_test_user(&store, "ana@x.com", "secret1", false, false)
        .await
        .unwrap();
    let app = nido::app(state);

    let cookie = login(&app, "ana@x.com", "secret1").await;
    let response = send(
        &app,
        authed_json_request("POST", "/payments/create-preference", json!({}), &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["preferenceId"], "pref-123");
    assert_eq!(body["checkoutUrl"], "https://provider.test/checkout/pref-123");
}

#[tokio::test]
async fn test_already_premium_cannot_create_preference() {
    let provider = MockServer::start().await;
    let (state, store) =
        create_test_state_with_settings(test_settings_with_payment_url(&provider.uri()));
    insert_test_user(&store, "prem@x.com", "secret1", true, false)
        .await
        .unwrap();
    let app = nido::app(state);

    let cookie = login(&app, "prem@x.com", "secret1").await;
    let response = send(
        &app,
        authed_json_request("POST", "/payments/create-preference", json!({}), &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Account is already premium");
    // No request reached the provider.
    assert!(provider.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_price_rejected() {
    let provider = MockServer::start().await;
    let (state, store) =
        create_test_state_with_settings(test_settings_with_payment_url(&provider.uri()));
    insert_test_user(&store, "ana@x.com", "secret1", false, false)
        .await
        .unwrap();
    let app = nido::app(state);

    let cookie = login(&app, "ana@x.com", "secret1").await;
    let response = send(
        &app,
        authed_json_request(
            "POST",
            "/payments/create-preference",
            json!({ "price": -5.0 }),
            &cookie,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_approved_payment_grants_premium() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/payments/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "approved",
            "external_reference": "ana@x.com",
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let (state, store) =
        create_test_state_with_settings(test_settings_with_payment_url(&provider.uri()));
    insert_test_user(&store, "ana@x.com", "secret1", false, false)
        .await
        .unwrap();
    let app = nido::app(state.clone());

    // Webhook deliveries carry no session; the numeric id form is what the
    // provider actually sends.
    let response = send(
        &app,
        json_request(
            "POST",
            "/payments/webhook",
            json!({ "type": "payment", "data": { "id": 42 } }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["received"], true);

    assert!(state.entitlement_service.premium_status("ana@x.com").await);
}

#[tokio::test]
async fn test_non_payment_event_acknowledged_without_effect() {
    let provider = MockServer::start().await;
    let (state, store) =
        create_test_state_with_settings(test_settings_with_payment_url(&provider.uri()));
    insert_test_user(&store, "ana@x.com", "secret1", false, false)
        .await
        .unwrap();
    let app = nido::app(state.clone());

    let response = send(
        &app,
        json_request(
            "POST",
            "/payments/webhook",
            json!({ "type": "subscription_preapproval", "data": { "id": "sub-1" } }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(!state.entitlement_service.premium_status("ana@x.com").await);
    assert!(provider.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unapproved_payment_does_not_grant_premium() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/payments/43"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "pending",
            "external_reference": "ana@x.com",
        })))
        .mount(&provider)
        .await;

    let (state, store) =
        create_test_state_with_settings(test_settings_with_payment_url(&provider.uri()));
    insert_test_user(&store, "ana@x.com", "secret1", false, false)
        .await
        .unwrap();
    let app = nido::app(state.clone());

    let response = send(
        &app,
        json_request(
            "POST",
            "/payments/webhook",
            json!({ "type": "payment", "data": { "id": "43" } }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(!state.entitlement_service.premium_status("ana@x.com").await);
}

#[tokio::test]
async fn test_provider_failure_surfaces_as_500() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/payments/44"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider down"))
        .mount(&provider)
        .await;

    let (state, _store) =
        create_test_state_with_settings(test_settings_with_payment_url(&provider.uri()));
    let app = nido::app(state);

    let response = send(
        &app,
        json_request(
            "POST",
            "/payments/webhook",
            json!({ "type": "payment", "data": { "id": 44 } }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
