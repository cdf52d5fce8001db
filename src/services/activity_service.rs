use crate::models::activity::{Activity, ActivityType};
use crate::repositories::{ActivityChanges, ActivityRepository, RepositoryError};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ActivityServiceError {
    #[error("Unknown activity type: {0}")]
    InvalidType(String),
    #[error("Nothing to update")]
    EmptyUpdate,
    #[error("Activity not found")]
    ActivityNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct CreateActivityRequest {
    pub activity_type: String,
    pub details: String,
    pub baby_name: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Default)]
pub struct UpdateActivityRequest {
    pub activity_type: Option<String>,
    pub details: Option<String>,
    pub baby_name: Option<String>,
    pub timestamp: Option<String>,
}

/// Logged-event lifecycle. Records have no surrogate key: they are
/// addressed by (user_email, timestamp) with exact string equality, so an
/// update that rewrites the timestamp must still be located by the value
/// that existed before the edit.
pub struct ActivityService {
    activities: Arc<dyn ActivityRepository>,
}

impl ActivityService {
    pub fn new(activities: Arc<dyn ActivityRepository>) -> Self {
        Self { activities }
    }

    pub async fn create(
        &self,
        email: &str,
        request: CreateActivityRequest,
    ) -> Result<Activity, ActivityServiceError> {
        // Validate the type before any store write.
        let activity_type = ActivityType::from_str(&request.activity_type)
            .map_err(|_| ActivityServiceError::InvalidType(request.activity_type.clone()))?;

        let activity = Activity {
            user_email: email.to_string(),
            baby_name: request.baby_name.unwrap_or_default(),
            activity_type,
            details: request.details,
            timestamp: request
                .timestamp
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        };
        self.activities.create_activity(&activity).await?;
        Ok(activity)
    }

    pub async fn list(&self, email: &str) -> Result<Vec<Activity>, ActivityServiceError> {
        Ok(self.activities.list_by_user(email).await?)
    }

    /// Partial update addressed by the pre-edit timestamp. After a
    /// successful update that carried a new `timestamp`, the record answers
    /// to the new value only; re-using the old key yields `ActivityNotFound`.
    pub async fn update(
        &self,
        email: &str,
        original_timestamp: &str,
        request: UpdateActivityRequest,
    ) -> Result<(), ActivityServiceError> {
        let activity_type = request
            .activity_type
            .as_deref()
            .map(|raw| {
                ActivityType::from_str(raw)
                    .map_err(|_| ActivityServiceError::InvalidType(raw.to_string()))
            })
            .transpose()?;

        let changes = ActivityChanges {
            baby_name: request.baby_name,
            activity_type,
            details: request.details,
            timestamp: request.timestamp,
        };
        if changes.is_empty() {
            return Err(ActivityServiceError::EmptyUpdate);
        }

        match self
            .activities
            .update_activity(email, original_timestamp, &changes)
            .await
        {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(ActivityServiceError::ActivityNotFound),
            Err(e) => Err(ActivityServiceError::RepositoryError(e)),
        }
    }

    pub async fn delete(
        &self,
        email: &str,
        timestamp: &str,
    ) -> Result<(), ActivityServiceError> {
        match self.activities.delete_activity(email, timestamp).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(ActivityServiceError::ActivityNotFound),
            Err(e) => Err(ActivityServiceError::RepositoryError(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::activity_repository::MockActivityRepository;

    #[tokio::test]
    async fn test_create_rejects_unknown_type_before_write() {
        // No expectations: the repository must not be touched.
        let service = ActivityService::new(Arc::new(MockActivityRepository::new()));
        let result = service
            .create(
                "ana@example.com",
                CreateActivityRequest {
                    activity_type: "screaming".to_string(),
                    details: String::new(),
                    baby_name: None,
                    timestamp: None,
                },
            )
            .await;
        assert!(matches!(result, Err(ActivityServiceError::InvalidType(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_empty_body() {
        let service = ActivityService::new(Arc::new(MockActivityRepository::new()));
        let result = service
            .update(
                "ana@example.com",
                "2026-02-01T10:00:00Z",
                UpdateActivityRequest::default(),
            )
            .await;
        assert!(matches!(result, Err(ActivityServiceError::EmptyUpdate)));
    }

    #[tokio::test]
    async fn test_update_unknown_type_rejected_before_lookup() {
        let service = ActivityService::new(Arc::new(MockActivityRepository::new()));
        let result = service
            .update(
                "ana@example.com",
                "2026-02-01T10:00:00Z",
                UpdateActivityRequest {
                    activity_type: Some("screaming".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ActivityServiceError::InvalidType(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_maps_to_not_found() {
        let mut activities = MockActivityRepository::new();
        activities
            .expect_delete_activity()
            .returning(|_, _| Box::pin(async { Err(RepositoryError::NotFound) }));

        let service = ActivityService::new(Arc::new(activities));
        let result = service.delete("ana@example.com", "2026-02-01T10:00:00Z").await;
        assert!(matches!(result, Err(ActivityServiceError::ActivityNotFound)));
    }
}
