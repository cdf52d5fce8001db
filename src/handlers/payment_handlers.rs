use crate::auth::current_email;
use crate::error::{AppError, Result};
use crate::services::payment_service::WebhookPayload;
use crate::AppState;
use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

#[derive(Deserialize, Default)]
pub struct CreatePreferenceBody {
    pub price: Option<f64>,
}

pub async fn create_preference_handler(
    State(state): State<AppState>,
    session: Session,
    body: Option<Json<CreatePreferenceBody>>,
) -> Result<Json<serde_json::Value>> {
    let email = current_email(&session).await?;

    if state.entitlement_service.premium_status(&email).await {
        return Err(AppError::Validation(
            "Account is already premium".to_string(),
        ));
    }

    let price = body.and_then(|Json(b)| b.price);
    if let Some(price) = price {
        if !(price.is_finite() && price > 0.0) {
            return Err(AppError::Validation("Invalid price".to_string()));
        }
    }

    let preference = state
        .payment_service
        .create_preference(&email, price)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    Ok(Json(json!({
        "checkoutUrl": preference.checkout_url,
        "preferenceId": preference.preference_id,
    })))
}

/// Provider webhook: unauthenticated by contract, always acknowledged with
/// 200 unless processing itself fails.
pub async fn payment_webhook_handler(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> Result<Json<serde_json::Value>> {
    state
        .payment_service
        .process_webhook(payload)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    Ok(Json(json!({ "received": true })))
}
