use crate::auth::current_email;
use crate::error::{AppError, Result};
use crate::services::family_service::FamilyServiceError;
use crate::AppState;
use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveChildProfileBody {
    pub name: String,
    pub birth_date: Option<String>,
}

pub async fn get_child_profile_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<serde_json::Value>> {
    let email = current_email(&session).await?;
    let membership = state
        .family_service
        .membership_of(&email)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let body = match membership {
        Some(m) => json!({
            "hasProfile": true,
            "profile": { "name": m.baby_name, "birthDate": m.birth_date },
        }),
        None => json!({ "hasProfile": false, "profile": null }),
    };
    Ok(Json(body))
}

/// First save establishes a new family with the caller as owner; later
/// saves fan the profile out to every membership row of the family.
pub async fn save_child_profile_handler(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SaveChildProfileBody>,
) -> Result<Json<serde_json::Value>> {
    let email = current_email(&session).await?;
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Child name is required".to_string()));
    }

    let existing = state
        .family_service
        .membership_of(&email)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let (name, birth_date) = if existing.is_some() {
        state
            .family_service
            .update_baby_profile(&email, Some(&body.name), body.birth_date.as_deref())
            .await
            .map_err(map_profile_error)?;
        (body.name.trim().to_string(), body.birth_date)
    } else {
        let membership = state
            .family_service
            .create_family(&email, &body.name, body.birth_date.as_deref())
            .await
            .map_err(map_profile_error)?;
        (membership.baby_name, membership.birth_date)
    };

    Ok(Json(json!({
        "success": true,
        "profile": { "name": name, "birthDate": birth_date },
    })))
}

fn map_profile_error(err: FamilyServiceError) -> AppError {
    match err {
        FamilyServiceError::MissingBabyName => {
            AppError::Validation("Child name is required".to_string())
        }
        FamilyServiceError::AlreadyInFamily => {
            AppError::Validation("Account already belongs to a family".to_string())
        }
        other => AppError::Upstream(other.to_string()),
    }
}
