use super::RepositoryResult;
use crate::models::comment::Comment;
use crate::store::{RowStore, SheetRow, Tab};
use async_trait::async_trait;
use std::sync::Arc;

// Comments tab column layout.
const COL_COMMENT_ID: usize = 0;
const COL_POST_ID: usize = 1;
const COL_USER_EMAIL: usize = 2;
const COL_CONTENT: usize = 3;
const COL_CREATED_AT: usize = 4;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait CommentRepository: Send + Sync {
    async fn create_comment(&self, comment: &Comment) -> RepositoryResult<()>;
    async fn list_by_user(&self, email: &str) -> RepositoryResult<Vec<Comment>>;
}

pub struct SheetCommentRepository {
    store: Arc<dyn RowStore>,
}

impl SheetCommentRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    fn row_to_comment(row: &SheetRow) -> Comment {
        Comment {
            comment_id: row.cell(COL_COMMENT_ID).to_string(),
            post_id: row.cell(COL_POST_ID).to_string(),
            user_email: row.cell(COL_USER_EMAIL).to_string(),
            content: row.cell(COL_CONTENT).to_string(),
            created_at: row.cell(COL_CREATED_AT).to_string(),
        }
    }
}

#[async_trait]
impl CommentRepository for SheetCommentRepository {
    async fn create_comment(&self, comment: &Comment) -> RepositoryResult<()> {
        self.store
            .append_row(
                Tab::Comments,
                vec![
                    comment.comment_id.clone(),
                    comment.post_id.clone(),
                    comment.user_email.clone(),
                    comment.content.clone(),
                    comment.created_at.clone(),
                ],
            )
            .await?;
        Ok(())
    }

    async fn list_by_user(&self, email: &str) -> RepositoryResult<Vec<Comment>> {
        let rows = self.store.read_rows(Tab::Comments).await?;
        Ok(rows
            .iter()
            .filter(|row| row.cell(COL_USER_EMAIL) == email)
            .map(Self::row_to_comment)
            .collect())
    }
}
