use super::{bool_cell, parse_bool_cell, RepositoryError, RepositoryResult};
use crate::models::family::{FamilyMembership, FamilyRole};
use crate::store::{RowStore, SheetRow, Tab};
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;

// Families tab column layout. One row per (family_id, user_email);
// baby_name and birth_date are denormalized onto every row.
const COL_FAMILY_ID: usize = 0;
const COL_USER_EMAIL: usize = 1;
const COL_BABY_NAME: usize = 2;
const COL_IS_OWNER: usize = 3;
const COL_ROLE: usize = 4;
const COL_BIRTH_DATE: usize = 5;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait FamilyRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<FamilyMembership>>;
    async fn find_by_family(&self, family_id: &str) -> RepositoryResult<Vec<FamilyMembership>>;
    async fn create_membership(&self, membership: &FamilyMembership) -> RepositoryResult<()>;
    async fn update_role(
        &self,
        family_id: &str,
        email: &str,
        role: FamilyRole,
    ) -> RepositoryResult<()>;

    /// Propagates the baby profile to every row of the family as a sequence
    /// of independent cell writes. The store has no transactions: a failure
    /// mid-sequence leaves earlier rows updated and later rows stale. The
    /// partial state is logged and the error surfaced; nothing rolls back.
    async fn update_family_profile(
        &self,
        family_id: &str,
        baby_name: Option<&str>,
        birth_date: Option<&str>,
    ) -> RepositoryResult<()>;
}

pub struct SheetFamilyRepository {
    store: Arc<dyn RowStore>,
}

impl SheetFamilyRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    fn row_to_membership(row: &SheetRow) -> FamilyMembership {
        let birth_date = row.cell(COL_BIRTH_DATE);
        FamilyMembership {
            family_id: row.cell(COL_FAMILY_ID).to_string(),
            user_email: row.cell(COL_USER_EMAIL).to_string(),
            baby_name: row.cell(COL_BABY_NAME).to_string(),
            is_owner: parse_bool_cell(row.cell(COL_IS_OWNER)),
            role: FamilyRole::from_str(row.cell(COL_ROLE)).unwrap_or(FamilyRole::Parent),
            birth_date: if birth_date.is_empty() {
                None
            } else {
                Some(birth_date.to_string())
            },
        }
    }
}

#[async_trait]
impl FamilyRepository for SheetFamilyRepository {
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<FamilyMembership>> {
        let rows = self.store.read_rows(Tab::Families).await?;
        Ok(rows
            .iter()
            .find(|row| row.cell(COL_USER_EMAIL) == email)
            .map(Self::row_to_membership))
    }

    async fn find_by_family(&self, family_id: &str) -> RepositoryResult<Vec<FamilyMembership>> {
        let rows = self.store.read_rows(Tab::Families).await?;
        Ok(rows
            .iter()
            .filter(|row| row.cell(COL_FAMILY_ID) == family_id)
            .map(Self::row_to_membership)
            .collect())
    }

    async fn create_membership(&self, membership: &FamilyMembership) -> RepositoryResult<()> {
        let rows = self.store.read_rows(Tab::Families).await?;
        let duplicate = rows.iter().any(|row| {
            row.cell(COL_FAMILY_ID) == membership.family_id
                && row.cell(COL_USER_EMAIL) == membership.user_email
        });
        if duplicate {
            return Err(RepositoryError::AlreadyExists);
        }

        self.store
            .append_row(
                Tab::Families,
                vec![
                    membership.family_id.clone(),
                    membership.user_email.clone(),
                    membership.baby_name.clone(),
                    bool_cell(membership.is_owner),
                    membership.role.to_string(),
                    membership.birth_date.clone().unwrap_or_default(),
                ],
            )
            .await?;
        Ok(())
    }

    async fn update_role(
        &self,
        family_id: &str,
        email: &str,
        role: FamilyRole,
    ) -> RepositoryResult<()> {
        let rows = self.store.read_rows(Tab::Families).await?;
        let index = rows
            .iter()
            .find(|row| {
                row.cell(COL_FAMILY_ID) == family_id && row.cell(COL_USER_EMAIL) == email
            })
            .map(|row| row.index)
            .ok_or(RepositoryError::NotFound)?;

        self.store
            .update_cell(Tab::Families, index, COL_ROLE, role.to_string())
            .await?;
        Ok(())
    }

    async fn update_family_profile(
        &self,
        family_id: &str,
        baby_name: Option<&str>,
        birth_date: Option<&str>,
    ) -> RepositoryResult<()> {
        let rows = self.store.read_rows(Tab::Families).await?;
        let member_rows: Vec<usize> = rows
            .iter()
            .filter(|row| row.cell(COL_FAMILY_ID) == family_id)
            .map(|row| row.index)
            .collect();

        if member_rows.is_empty() {
            return Err(RepositoryError::NotFound);
        }

        let mut updated = 0usize;
        for index in &member_rows {
            if let Some(name) = baby_name {
                if let Err(e) = self
                    .store
                    .update_cell(Tab::Families, *index, COL_BABY_NAME, name.to_string())
                    .await
                {
                    tracing::warn!(
                        family_id,
                        updated,
                        total = member_rows.len(),
                        "baby name fan-out failed mid-sequence: {}",
                        e
                    );
                    return Err(e.into());
                }
            }
            if let Some(date) = birth_date {
                if let Err(e) = self
                    .store
                    .update_cell(Tab::Families, *index, COL_BIRTH_DATE, date.to_string())
                    .await
                {
                    tracing::warn!(
                        family_id,
                        updated,
                        total = member_rows.len(),
                        "birth date fan-out failed mid-sequence: {}",
                        e
                    );
                    return Err(e.into());
                }
            }
            updated += 1;
        }
        Ok(())
    }
}
