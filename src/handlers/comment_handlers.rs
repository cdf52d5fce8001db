use crate::auth::current_email;
use crate::error::{AppError, Result};
use crate::services::comment_service::{CommentServiceError, CreateCommentRequest};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentBody {
    #[serde(default)]
    pub post_id: String,
    #[serde(default)]
    pub content: String,
}

pub async fn create_comment_handler(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CreateCommentBody>,
) -> Result<Response> {
    let email = current_email(&session).await?;
    let created = state
        .comment_service
        .create(
            &email,
            CreateCommentRequest {
                post_id: body.post_id,
                content: body.content,
            },
        )
        .await
        .map_err(|err| match err {
            CommentServiceError::MissingPostId => {
                AppError::Validation("postId is required".to_string())
            }
            CommentServiceError::ContentTooShort => {
                AppError::Validation("Comment must be at least 3 characters".to_string())
            }
            CommentServiceError::QuotaExceeded { count, limit } => {
                AppError::QuotaExceeded { count, limit }
            }
            other => AppError::Upstream(other.to_string()),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "commentId": created.comment.comment_id,
            "todayCommentCount": created.today_count,
        })),
    )
        .into_response())
}
