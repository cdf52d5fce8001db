use crate::auth::current_email;
use crate::error::{AppError, Result};
use crate::models::family::FamilyRole;
use crate::services::family_service::FamilyServiceError;
use crate::AppState;
use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

/// POST /family body, dispatched on the `action` field.
#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum FamilyAction {
    #[serde(rename_all = "camelCase")]
    UpdateBabyName {
        baby_name: Option<String>,
        birth_date: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    InviteUser {
        email: String,
        role: Option<FamilyRole>,
    },
    #[serde(rename_all = "camelCase")]
    UpdateUserRole { email: String, role: FamilyRole },
    #[serde(rename_all = "camelCase")]
    UpdateMyRole { role: FamilyRole },
}

fn map_family_error(err: FamilyServiceError) -> AppError {
    match err {
        FamilyServiceError::NotOwner => AppError::Forbidden,
        FamilyServiceError::FamilyNotFound => {
            AppError::Validation("No family found for this account".to_string())
        }
        FamilyServiceError::AlreadyInFamily => {
            AppError::Validation("Account already belongs to a family".to_string())
        }
        FamilyServiceError::InvitationTargetInvalid => {
            AppError::Validation("That user cannot be invited".to_string())
        }
        FamilyServiceError::OwnerRoleReserved => {
            AppError::Validation("The owner role cannot be assigned".to_string())
        }
        FamilyServiceError::MissingBabyName => {
            AppError::Validation("Baby name is required".to_string())
        }
        FamilyServiceError::RepositoryError(e) => AppError::Upstream(e.to_string()),
    }
}

pub async fn get_family_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<serde_json::Value>> {
    let email = current_email(&session).await?;
    let info = state
        .family_service
        .family_info(&email)
        .await
        .map_err(map_family_error)?;
    Ok(Json(json!({ "family": info })))
}

pub async fn family_action_handler(
    State(state): State<AppState>,
    session: Session,
    Json(action): Json<FamilyAction>,
) -> Result<Json<serde_json::Value>> {
    let email = current_email(&session).await?;

    match action {
        FamilyAction::UpdateBabyName {
            baby_name,
            birth_date,
        } => {
            if baby_name.is_none() && birth_date.is_none() {
                return Err(AppError::Validation("Nothing to update".to_string()));
            }
            state
                .family_service
                .update_baby_profile(&email, baby_name.as_deref(), birth_date.as_deref())
                .await
                .map_err(map_family_error)?;
        }
        FamilyAction::InviteUser {
            email: target,
            role,
        } => {
            state
                .family_service
                .invite_user(&email, &target, role)
                .await
                .map_err(map_family_error)?;
        }
        FamilyAction::UpdateUserRole {
            email: target,
            role,
        } => {
            state
                .family_service
                .update_user_role(&email, &target, role)
                .await
                .map_err(map_family_error)?;
        }
        FamilyAction::UpdateMyRole { role } => {
            state
                .family_service
                .update_my_role(&email, role)
                .await
                .map_err(map_family_error)?;
        }
    }

    Ok(Json(json!({ "success": true })))
}
