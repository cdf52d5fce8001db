use crate::auth::SESSION_EMAIL_KEY;
use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

pub async fn require_auth(session: Session, request: Request, next: Next) -> Response {
    if let Ok(Some(_email)) = session.get::<String>(SESSION_EMAIL_KEY).await {
        next.run(request).await
    } else {
        AppError::Unauthorized.into_response()
    }
}

/// Premium gate. Re-reads the flag from the store on every request and
/// fails closed: a store failure denies access rather than honoring a
/// possibly stale grant.
pub async fn require_premium(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let email = match session.get::<String>(SESSION_EMAIL_KEY).await {
        Ok(Some(email)) => email,
        _ => return AppError::Unauthorized.into_response(),
    };

    if state.entitlement_service.premium_status(&email).await {
        next.run(request).await
    } else {
        AppError::PremiumRequired.into_response()
    }
}

/// Admin gate for every admin-surface request; fails closed like
/// `require_premium`.
pub async fn require_admin(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let email = match session.get::<String>(SESSION_EMAIL_KEY).await {
        Ok(Some(email)) => email,
        _ => return AppError::Unauthorized.into_response(),
    };

    if state.entitlement_service.admin_status(&email).await {
        next.run(request).await
    } else {
        AppError::Forbidden.into_response()
    }
}
