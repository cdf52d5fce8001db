pub mod handlers;
pub mod middleware;

use crate::error::AppError;
use tower_sessions::Session;

pub const SESSION_EMAIL_KEY: &str = "user_email";

/// Email of the authenticated caller, or `Unauthorized`.
pub async fn current_email(session: &Session) -> Result<String, AppError> {
    session
        .get::<String>(SESSION_EMAIL_KEY)
        .await
        .ok()
        .flatten()
        .ok_or(AppError::Unauthorized)
}
