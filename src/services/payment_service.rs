use crate::config::Settings;
use crate::repositories::{RepositoryError, UserRepository};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum PaymentServiceError {
    #[error("Payment provider request failed: {0}")]
    Provider(#[from] reqwest::Error),
    #[error("Payment provider returned status {0}: {1}")]
    ProviderStatus(u16, String),
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Checkout preference returned to the client.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPreference {
    pub preference_id: String,
    pub checkout_url: String,
}

/// Provider webhook body: `{"type": "...", "data": {"id": "..."}}`.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub id: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct PaymentRecord {
    status: String,
    #[serde(default)]
    external_reference: String,
}

/// Outcome of a webhook delivery, for logging and the acknowledgement body.
#[derive(Debug, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Payment approved; premium flag flipped for the referenced user.
    PremiumGranted(String),
    /// Event acknowledged without effect (wrong type, unapproved status,
    /// or missing reference).
    Ignored,
}

/// Minimal payment-provider integration: preference creation before
/// checkout and webhook confirmation afterwards. The only persisted effect
/// of a payment is `is_premium` flipping to true; the payment itself is
/// never stored.
pub struct PaymentService {
    client: reqwest::Client,
    users: Arc<dyn UserRepository>,
    settings: Settings,
}

impl PaymentService {
    pub fn new(users: Arc<dyn UserRepository>, settings: Settings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            users,
            settings,
        }
    }

    pub async fn create_preference(
        &self,
        email: &str,
        price: Option<f64>,
    ) -> Result<CheckoutPreference, PaymentServiceError> {
        let price = price.unwrap_or(self.settings.premium_price);
        let body = json!({
            "items": [{
                "title": "Premium subscription",
                "quantity": 1,
                "unit_price": price,
            }],
            "external_reference": email,
            "back_urls": {
                "success": format!("{}/payments/success", self.settings.base_url),
                "failure": format!("{}/payments/failure", self.settings.base_url),
            },
            "auto_return": "approved",
        });

        let url = format!("{}/checkout/preferences", self.settings.payment_api_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.payment_api_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentServiceError::ProviderStatus(status.as_u16(), body));
        }

        let payload: serde_json::Value = response.json().await?;
        let preference_id = payload
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| PaymentServiceError::MalformedResponse("missing id".to_string()))?
            .to_string();
        let checkout_url = payload
            .get("init_point")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                PaymentServiceError::MalformedResponse("missing init_point".to_string())
            })?
            .to_string();

        Ok(CheckoutPreference {
            preference_id,
            checkout_url,
        })
    }

    /// Handles a provider webhook. Only `type == "payment"` is acted on;
    /// everything else is acknowledged and dropped. An approved payment
    /// flips `is_premium` for the user named in `external_reference`.
    pub async fn process_webhook(
        &self,
        payload: WebhookPayload,
    ) -> Result<WebhookOutcome, PaymentServiceError> {
        if payload.event_type != "payment" {
            tracing::debug!("ignoring webhook of type {:?}", payload.event_type);
            return Ok(WebhookOutcome::Ignored);
        }

        // The provider sends the id as either a string or a number.
        let payment_id = match &payload.data.id {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                return Err(PaymentServiceError::MalformedResponse(format!(
                    "unexpected payment id: {}",
                    other
                )))
            }
        };

        let url = format!("{}/v1/payments/{}", self.settings.payment_api_url, payment_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.settings.payment_api_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentServiceError::ProviderStatus(status.as_u16(), body));
        }

        let record: PaymentRecord = response
            .json()
            .await
            .map_err(|e| PaymentServiceError::MalformedResponse(e.to_string()))?;

        if record.status != "approved" || record.external_reference.is_empty() {
            tracing::info!(
                payment_id,
                status = record.status,
                "payment not actionable"
            );
            return Ok(WebhookOutcome::Ignored);
        }

        self.users
            .set_premium(&record.external_reference, true)
            .await?;
        tracing::info!(payment_id, email = record.external_reference, "premium granted");
        Ok(WebhookOutcome::PremiumGranted(record.external_reference))
    }
}
