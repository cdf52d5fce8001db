use chrono_tz::Tz;
use std::env;

/// Application settings loaded from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Time zone used for all calendar-day computations (daily quotas).
    pub timezone: Tz,
    /// Max comments per local calendar day for non-premium users.
    pub free_daily_comment_limit: u32,
    /// Payment provider REST base URL.
    pub payment_api_url: String,
    /// Payment provider access token.
    pub payment_api_token: String,
    /// Default premium price when the request does not carry one.
    pub premium_price: f64,
    /// Public base URL, used for payment redirect targets.
    pub base_url: String,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let timezone: Tz = env::var("SERVICE_TIMEZONE")
            .unwrap_or_else(|_| "America/Argentina/Buenos_Aires".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid SERVICE_TIMEZONE: {}", e))?;

        let free_daily_comment_limit = env::var("FREE_DAILY_COMMENT_LIMIT")
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("Invalid FREE_DAILY_COMMENT_LIMIT: {}", e))?
            .unwrap_or(3);

        let premium_price = env::var("PREMIUM_PRICE")
            .ok()
            .map(|v| v.parse::<f64>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("Invalid PREMIUM_PRICE: {}", e))?
            .unwrap_or(2999.0);

        Ok(Self {
            timezone,
            free_daily_comment_limit,
            payment_api_url: env::var("PAYMENT_API_URL")
                .unwrap_or_else(|_| "https://api.mercadopago.com".to_string()),
            payment_api_token: env::var("PAYMENT_API_TOKEN").unwrap_or_default(),
            premium_price,
            base_url: env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}
