use super::{bool_cell, parse_bool_cell, RepositoryError, RepositoryResult};
use crate::models::user::User;
use crate::store::{RowStore, SheetRow, Tab};
use async_trait::async_trait;
use std::sync::Arc;

// Users tab column layout.
const COL_EMAIL: usize = 0;
const COL_NAME: usize = 1;
const COL_IMAGE: usize = 2;
const COL_IS_PREMIUM: usize = 3;
const COL_IS_ADMIN: usize = 4;
const COL_PASSWORD_HASH: usize = 5;
const COL_CREATED_AT: usize = 6;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    /// Appends a user row. Uniqueness on email is scan-enforced only: two
    /// concurrent creates can both pass the scan, and the store will keep
    /// both rows (the first one wins all later lookups).
    async fn create_user(&self, user: &User) -> RepositoryResult<()>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;
    async fn set_premium(&self, email: &str, premium: bool) -> RepositoryResult<()>;
    async fn set_admin(&self, email: &str, admin: bool) -> RepositoryResult<()>;
    async fn update_name(&self, email: &str, name: &str) -> RepositoryResult<()>;
}

pub struct SheetUserRepository {
    store: Arc<dyn RowStore>,
}

impl SheetUserRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    fn row_to_user(row: &SheetRow) -> User {
        User {
            email: row.cell(COL_EMAIL).to_string(),
            name: row.cell(COL_NAME).to_string(),
            image: row.cell(COL_IMAGE).to_string(),
            is_premium: parse_bool_cell(row.cell(COL_IS_PREMIUM)),
            is_admin: parse_bool_cell(row.cell(COL_IS_ADMIN)),
            password_hash: row.cell(COL_PASSWORD_HASH).to_string(),
            created_at: row.cell(COL_CREATED_AT).to_string(),
        }
    }

    async fn find_row_index(&self, email: &str) -> RepositoryResult<usize> {
        let rows = self.store.read_rows(Tab::Users).await?;
        rows.iter()
            .find(|row| row.cell(COL_EMAIL) == email)
            .map(|row| row.index)
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl UserRepository for SheetUserRepository {
    async fn create_user(&self, user: &User) -> RepositoryResult<()> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(RepositoryError::AlreadyExists);
        }

        self.store
            .append_row(
                Tab::Users,
                vec![
                    user.email.clone(),
                    user.name.clone(),
                    user.image.clone(),
                    bool_cell(user.is_premium),
                    bool_cell(user.is_admin),
                    user.password_hash.clone(),
                    user.created_at.clone(),
                ],
            )
            .await?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let rows = self.store.read_rows(Tab::Users).await?;
        Ok(rows
            .iter()
            .find(|row| row.cell(COL_EMAIL) == email)
            .map(Self::row_to_user))
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let rows = self.store.read_rows(Tab::Users).await?;
        Ok(rows.iter().map(Self::row_to_user).collect())
    }

    async fn set_premium(&self, email: &str, premium: bool) -> RepositoryResult<()> {
        let index = self.find_row_index(email).await?;
        self.store
            .update_cell(Tab::Users, index, COL_IS_PREMIUM, bool_cell(premium))
            .await?;
        Ok(())
    }

    async fn set_admin(&self, email: &str, admin: bool) -> RepositoryResult<()> {
        let index = self.find_row_index(email).await?;
        self.store
            .update_cell(Tab::Users, index, COL_IS_ADMIN, bool_cell(admin))
            .await?;
        Ok(())
    }

    async fn update_name(&self, email: &str, name: &str) -> RepositoryResult<()> {
        let index = self.find_row_index(email).await?;
        self.store
            .update_cell(Tab::Users, index, COL_NAME, name.to_string())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRowStore;

    fn sample_user(email: &str) -> User {
        User {
            email: email.to_string(),
            name: "Ana".to_string(),
            image: String::new(),
            is_premium: false,
            is_admin: false,
            password_hash: "hash".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = SheetUserRepository::new(Arc::new(MemoryRowStore::new()));
        repo.create_user(&sample_user("ana@example.com")).await.unwrap();

        let found = repo.find_by_email("ana@example.com").await.unwrap().unwrap();
        assert_eq!(found.name, "Ana");
        assert!(!found.is_premium);
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = SheetUserRepository::new(Arc::new(MemoryRowStore::new()));
        repo.create_user(&sample_user("ana@example.com")).await.unwrap();

        let result = repo.create_user(&sample_user("ana@example.com")).await;
        assert!(matches!(result, Err(RepositoryError::AlreadyExists)));
    }

    #[tokio::test]
    async fn test_set_premium() {
        let repo = SheetUserRepository::new(Arc::new(MemoryRowStore::new()));
        repo.create_user(&sample_user("ana@example.com")).await.unwrap();

        repo.set_premium("ana@example.com", true).await.unwrap();
        let found = repo.find_by_email("ana@example.com").await.unwrap().unwrap();
        assert!(found.is_premium);
    }

    #[tokio::test]
    async fn test_set_premium_missing_user() {
        let repo = SheetUserRepository::new(Arc::new(MemoryRowStore::new()));
        let result = repo.set_premium("ghost@example.com", true).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}
