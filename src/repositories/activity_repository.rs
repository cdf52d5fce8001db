use super::{RepositoryError, RepositoryResult};
use crate::models::activity::{Activity, ActivityType};
use crate::store::{RowStore, SheetRow, Tab};
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;

// Activities tab column layout.
const COL_USER_EMAIL: usize = 0;
const COL_BABY_NAME: usize = 1;
const COL_TYPE: usize = 2;
const COL_DETAILS: usize = 3;
const COL_TIMESTAMP: usize = 4;

/// Partial update: only present fields are written, one cell each.
#[derive(Debug, Clone, Default)]
pub struct ActivityChanges {
    pub baby_name: Option<String>,
    pub activity_type: Option<ActivityType>,
    pub details: Option<String>,
    pub timestamp: Option<String>,
}

impl ActivityChanges {
    pub fn is_empty(&self) -> bool {
        self.baby_name.is_none()
            && self.activity_type.is_none()
            && self.details.is_none()
            && self.timestamp.is_none()
    }
}

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ActivityRepository: Send + Sync {
    async fn create_activity(&self, activity: &Activity) -> RepositoryResult<()>;
    async fn list_by_user(&self, email: &str) -> RepositoryResult<Vec<Activity>>;

    /// Locates the row by exact string equality on (user_email, timestamp)
    /// and writes the provided fields. When `changes.timestamp` is set the
    /// timestamp cell itself is rewritten, so the row is addressable by the
    /// new value only afterwards. If several rows share the key, the first
    /// in sheet order wins.
    async fn update_activity(
        &self,
        email: &str,
        original_timestamp: &str,
        changes: &ActivityChanges,
    ) -> RepositoryResult<()>;

    async fn delete_activity(&self, email: &str, timestamp: &str) -> RepositoryResult<()>;
}

pub struct SheetActivityRepository {
    store: Arc<dyn RowStore>,
}

impl SheetActivityRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    fn row_to_activity(row: &SheetRow) -> Activity {
        Activity {
            user_email: row.cell(COL_USER_EMAIL).to_string(),
            baby_name: row.cell(COL_BABY_NAME).to_string(),
            activity_type: ActivityType::from_str(row.cell(COL_TYPE))
                .unwrap_or(ActivityType::Milestone),
            details: row.cell(COL_DETAILS).to_string(),
            timestamp: row.cell(COL_TIMESTAMP).to_string(),
        }
    }

    async fn find_row_index(&self, email: &str, timestamp: &str) -> RepositoryResult<usize> {
        let rows = self.store.read_rows(Tab::Activities).await?;
        rows.iter()
            .find(|row| {
                row.cell(COL_USER_EMAIL) == email && row.cell(COL_TIMESTAMP) == timestamp
            })
            .map(|row| row.index)
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl ActivityRepository for SheetActivityRepository {
    async fn create_activity(&self, activity: &Activity) -> RepositoryResult<()> {
        self.store
            .append_row(
                Tab::Activities,
                vec![
                    activity.user_email.clone(),
                    activity.baby_name.clone(),
                    activity.activity_type.to_string(),
                    activity.details.clone(),
                    activity.timestamp.clone(),
                ],
            )
            .await?;
        Ok(())
    }

    async fn list_by_user(&self, email: &str) -> RepositoryResult<Vec<Activity>> {
        let rows = self.store.read_rows(Tab::Activities).await?;
        Ok(rows
            .iter()
            .filter(|row| row.cell(COL_USER_EMAIL) == email)
            .map(Self::row_to_activity)
            .collect())
    }

    async fn update_activity(
        &self,
        email: &str,
        original_timestamp: &str,
        changes: &ActivityChanges,
    ) -> RepositoryResult<()> {
        let index = self.find_row_index(email, original_timestamp).await?;

        if let Some(ref name) = changes.baby_name {
            self.store
                .update_cell(Tab::Activities, index, COL_BABY_NAME, name.clone())
                .await?;
        }
        if let Some(activity_type) = changes.activity_type {
            self.store
                .update_cell(Tab::Activities, index, COL_TYPE, activity_type.to_string())
                .await?;
        }
        if let Some(ref details) = changes.details {
            self.store
                .update_cell(Tab::Activities, index, COL_DETAILS, details.clone())
                .await?;
        }
        if let Some(ref timestamp) = changes.timestamp {
            self.store
                .update_cell(Tab::Activities, index, COL_TIMESTAMP, timestamp.clone())
                .await?;
        }
        Ok(())
    }

    async fn delete_activity(&self, email: &str, timestamp: &str) -> RepositoryResult<()> {
        let index = self.find_row_index(email, timestamp).await?;
        self.store.delete_row(Tab::Activities, index).await?;
        Ok(())
    }
}
