use crate::error::{AppError, Result};
use crate::services::user_service::{AdminUpdateRequest, UserServiceError};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateBody {
    pub name: Option<String>,
    pub is_premium: Option<bool>,
    pub is_admin: Option<bool>,
}

pub async fn list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let users = state
        .user_service
        .list_users()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    Ok(Json(json!({ "users": users })))
}

pub async fn admin_update_user_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(body): Json<AdminUpdateBody>,
) -> Result<Json<serde_json::Value>> {
    let user = state
        .user_service
        .admin_update(
            &email,
            AdminUpdateRequest {
                name: body.name,
                is_premium: body.is_premium,
                is_admin: body.is_admin,
            },
        )
        .await
        .map_err(|err| match err {
            UserServiceError::MissingName => AppError::Validation("Name is required".to_string()),
            other => AppError::Upstream(other.to_string()),
        })?;
    Ok(Json(json!({ "success": true, "user": user })))
}
