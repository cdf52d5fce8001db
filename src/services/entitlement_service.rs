use crate::repositories::{CommentRepository, RepositoryError, UserRepository};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum EntitlementError {
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Outcome of a free-tier quota check, carrying the current count so the
/// caller can render "X of N used".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed { count: u32 },
    Rejected { count: u32, limit: u32 },
}

/// Derived entitlements over the row store.
///
/// Premium and admin flags are re-read from the store on every check and
/// fail closed: any lookup failure reads as "not entitled", never as a
/// stale grant. Daily usage is recomputed per request in the configured
/// time zone; there is no atomic increment, so a quota check and the write
/// that follows it can race (overshoot bounded by concurrent requests − 1).
pub struct EntitlementService {
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
    timezone: Tz,
    free_daily_comment_limit: u32,
}

impl EntitlementService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        comments: Arc<dyn CommentRepository>,
        timezone: Tz,
        free_daily_comment_limit: u32,
    ) -> Self {
        Self {
            users,
            comments,
            timezone,
            free_daily_comment_limit,
        }
    }

    pub fn comment_limit(&self) -> u32 {
        self.free_daily_comment_limit
    }

    /// Fail-closed premium check.
    pub async fn premium_status(&self, email: &str) -> bool {
        match self.users.find_by_email(email).await {
            Ok(Some(user)) => user.is_premium,
            Ok(None) => false,
            Err(e) => {
                tracing::error!("premium lookup failed for {}: {}", email, e);
                false
            }
        }
    }

    /// Fail-closed admin check.
    pub async fn admin_status(&self, email: &str) -> bool {
        match self.users.find_by_email(email).await {
            Ok(Some(user)) => user.is_admin,
            Ok(None) => false,
            Err(e) => {
                tracing::error!("admin lookup failed for {}: {}", email, e);
                false
            }
        }
    }

    /// Number of the user's comments whose creation time falls on today's
    /// calendar date in the configured time zone. The boundary is exact
    /// local midnight: 23:59:59 yesterday and 00:01 today never count
    /// together.
    pub async fn comments_today(&self, email: &str) -> Result<u32, EntitlementError> {
        self.comments_on(email, Utc::now()).await
    }

    async fn comments_on(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<u32, EntitlementError> {
        let today = now.with_timezone(&self.timezone).date_naive();
        let comments = self.comments.list_by_user(email).await?;

        let count = comments
            .iter()
            .filter(|comment| {
                match DateTime::parse_from_rfc3339(&comment.created_at) {
                    Ok(created) => created.with_timezone(&self.timezone).date_naive() == today,
                    Err(e) => {
                        tracing::warn!(
                            "unparseable comment timestamp {:?}: {}",
                            comment.created_at,
                            e
                        );
                        false
                    }
                }
            })
            .count();
        Ok(count as u32)
    }

    /// Quota policy: premium is unlimited; free users get
    /// `free_daily_comment_limit` per local day. An over-limit action is
    /// rejected outright, never truncated or queued.
    pub async fn check_comment_quota(&self, email: &str) -> Result<QuotaDecision, EntitlementError> {
        if self.premium_status(email).await {
            let count = self.comments_today(email).await?;
            return Ok(QuotaDecision::Allowed { count });
        }

        let count = self.comments_today(email).await?;
        if count >= self.free_daily_comment_limit {
            Ok(QuotaDecision::Rejected {
                count,
                limit: self.free_daily_comment_limit,
            })
        } else {
            Ok(QuotaDecision::Allowed { count })
        }
    }
}
