use crate::models::comment::Comment;
use crate::repositories::{CommentRepository, RepositoryError};
use crate::services::entitlement_service::{EntitlementError, EntitlementService, QuotaDecision};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    #[error("Comment must be at least 3 characters")]
    ContentTooShort,
    #[error("Post id is required")]
    MissingPostId,
    #[error("Daily comment limit reached ({count}/{limit})")]
    QuotaExceeded { count: u32, limit: u32 },
    #[error("Entitlement error: {0}")]
    Entitlement(#[from] EntitlementError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct CreateCommentRequest {
    pub post_id: String,
    pub content: String,
}

/// Result of a successful comment creation, with the post-write daily
/// count for "X of N used" rendering.
pub struct CreatedComment {
    pub comment: Comment,
    pub today_count: u32,
}

/// Community comments gated by the free-tier daily quota.
///
/// The quota check and the append are two separate store round trips with
/// no conditional-write primitive between them, so concurrent requests
/// from one user can all pass the check before any write lands. The stored
/// count can exceed the limit by (concurrent requests − 1); this is an
/// accepted limitation of the backing store.
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    entitlements: Arc<EntitlementService>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, entitlements: Arc<EntitlementService>) -> Self {
        Self {
            comments,
            entitlements,
        }
    }

    pub async fn create(
        &self,
        email: &str,
        request: CreateCommentRequest,
    ) -> Result<CreatedComment, CommentServiceError> {
        if request.post_id.trim().is_empty() {
            return Err(CommentServiceError::MissingPostId);
        }
        if request.content.trim().len() < 3 {
            return Err(CommentServiceError::ContentTooShort);
        }

        let count = match self.entitlements.check_comment_quota(email).await? {
            QuotaDecision::Allowed { count } => count,
            QuotaDecision::Rejected { count, limit } => {
                return Err(CommentServiceError::QuotaExceeded { count, limit })
            }
        };

        let comment = Comment {
            comment_id: Uuid::new_v4().to_string(),
            post_id: request.post_id.trim().to_string(),
            user_email: email.to_string(),
            content: request.content.trim().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.comments.create_comment(&comment).await?;

        Ok(CreatedComment {
            comment,
            today_count: count + 1,
        })
    }
}
