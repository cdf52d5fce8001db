use crate::auth::current_email;
use crate::error::{AppError, Result};
use crate::services::activity_service::{
    ActivityServiceError, CreateActivityRequest, UpdateActivityRequest,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityBody {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub details: String,
    pub baby_name: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityBody {
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub details: Option<String>,
    pub baby_name: Option<String>,
    pub timestamp: Option<String>,
}

fn map_activity_error(err: ActivityServiceError) -> AppError {
    match err {
        ActivityServiceError::InvalidType(t) => {
            AppError::Validation(format!("Unknown activity type: {}", t))
        }
        ActivityServiceError::EmptyUpdate => {
            AppError::Validation("No fields to update".to_string())
        }
        // Misses surface as a generic failure, not a distinct 404.
        other => AppError::Upstream(other.to_string()),
    }
}

pub async fn list_activities_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<serde_json::Value>> {
    let email = current_email(&session).await?;
    let activities = state
        .activity_service
        .list(&email)
        .await
        .map_err(map_activity_error)?;
    Ok(Json(json!({ "activities": activities })))
}

pub async fn create_activity_handler(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CreateActivityBody>,
) -> Result<Response> {
    let email = current_email(&session).await?;
    let activity = state
        .activity_service
        .create(
            &email,
            CreateActivityRequest {
                activity_type: body.activity_type,
                details: body.details,
                baby_name: body.baby_name,
                timestamp: body.timestamp,
            },
        )
        .await
        .map_err(map_activity_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "activity": activity })),
    )
        .into_response())
}

/// The path identifier is the activity's pre-update timestamp, exactly as
/// stored; a `timestamp` field in the body rewrites the value but the row
/// is located by the path value.
pub async fn update_activity_handler(
    State(state): State<AppState>,
    session: Session,
    Path(original_timestamp): Path<String>,
    Json(body): Json<UpdateActivityBody>,
) -> Result<Json<serde_json::Value>> {
    let email = current_email(&session).await?;
    state
        .activity_service
        .update(
            &email,
            &original_timestamp,
            UpdateActivityRequest {
                activity_type: body.activity_type,
                details: body.details,
                baby_name: body.baby_name,
                timestamp: body.timestamp,
            },
        )
        .await
        .map_err(map_activity_error)?;
    Ok(Json(json!({ "success": true })))
}

pub async fn delete_activity_handler(
    State(state): State<AppState>,
    session: Session,
    Path(timestamp): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let email = current_email(&session).await?;
    state
        .activity_service
        .delete(&email, &timestamp)
        .await
        .map_err(map_activity_error)?;
    Ok(Json(json!({ "success": true })))
}
