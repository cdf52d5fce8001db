use crate::models::family::{FamilyMembership, FamilyRole};
use crate::repositories::{FamilyRepository, RepositoryError, UserRepository};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum FamilyServiceError {
    #[error("Family not found")]
    FamilyNotFound,
    #[error("Only the family owner can do that")]
    NotOwner,
    #[error("User already belongs to a family")]
    AlreadyInFamily,
    #[error("Invitation target is invalid")]
    InvitationTargetInvalid,
    #[error("The owner role cannot be assigned")]
    OwnerRoleReserved,
    #[error("Baby name is required")]
    MissingBabyName,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Family info as rendered to members: the shared baby profile plus the
/// member list.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyInfo {
    pub family_id: String,
    pub baby_name: String,
    pub birth_date: Option<String>,
    pub members: Vec<FamilyMembership>,
}

/// Membership lifecycle over the Families tab.
///
/// Invariants enforced here, not by the store: at most one membership per
/// user, exactly one owner row per family, and families never merge. Role
/// changes on another member's row require the caller to be the owner of
/// that member's family; the check lives in this service so no handler can
/// skip it.
pub struct FamilyService {
    families: Arc<dyn FamilyRepository>,
    users: Arc<dyn UserRepository>,
}

impl FamilyService {
    pub fn new(families: Arc<dyn FamilyRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { families, users }
    }

    /// NoFamily -> OwnerOfFamily: allocates a family id and inserts the
    /// owner row.
    pub async fn create_family(
        &self,
        email: &str,
        baby_name: &str,
        birth_date: Option<&str>,
    ) -> Result<FamilyMembership, FamilyServiceError> {
        let baby_name = baby_name.trim();
        if baby_name.is_empty() {
            return Err(FamilyServiceError::MissingBabyName);
        }
        if self.families.find_by_email(email).await?.is_some() {
            return Err(FamilyServiceError::AlreadyInFamily);
        }

        let membership = FamilyMembership {
            family_id: Uuid::new_v4().to_string(),
            user_email: email.to_string(),
            baby_name: baby_name.to_string(),
            is_owner: true,
            role: FamilyRole::Owner,
            birth_date: birth_date.map(str::to_string),
        };
        self.families.create_membership(&membership).await?;
        Ok(membership)
    }

    /// Adds `target_email` to the inviter's family. Rejects targets that
    /// already belong to any family — families are never merged.
    pub async fn invite_user(
        &self,
        inviter_email: &str,
        target_email: &str,
        role: Option<FamilyRole>,
    ) -> Result<FamilyMembership, FamilyServiceError> {
        let inviter = self
            .families
            .find_by_email(inviter_email)
            .await?
            .ok_or(FamilyServiceError::FamilyNotFound)?;

        if target_email == inviter_email
            || self.users.find_by_email(target_email).await?.is_none()
            || self.families.find_by_email(target_email).await?.is_some()
        {
            return Err(FamilyServiceError::InvitationTargetInvalid);
        }

        let role = role.unwrap_or(FamilyRole::Parent);
        if role == FamilyRole::Owner {
            return Err(FamilyServiceError::OwnerRoleReserved);
        }

        let membership = FamilyMembership {
            family_id: inviter.family_id,
            user_email: target_email.to_string(),
            baby_name: inviter.baby_name,
            is_owner: false,
            role,
            birth_date: inviter.birth_date,
        };
        self.families.create_membership(&membership).await?;
        Ok(membership)
    }

    /// Self-service role change, restricted to non-owner roles.
    pub async fn update_my_role(
        &self,
        email: &str,
        role: FamilyRole,
    ) -> Result<(), FamilyServiceError> {
        if role == FamilyRole::Owner {
            return Err(FamilyServiceError::OwnerRoleReserved);
        }
        let membership = self
            .families
            .find_by_email(email)
            .await?
            .ok_or(FamilyServiceError::FamilyNotFound)?;

        self.families
            .update_role(&membership.family_id, email, role)
            .await?;
        Ok(())
    }

    /// Owner-driven role change on another member.
    ///
    /// Precondition checked here regardless of what the handler verified:
    /// the caller's own membership must carry the owner flag AND share a
    /// family with the target. "Is an owner of some family" is not enough.
    pub async fn update_user_role(
        &self,
        caller_email: &str,
        target_email: &str,
        role: FamilyRole,
    ) -> Result<(), FamilyServiceError> {
        if role == FamilyRole::Owner {
            return Err(FamilyServiceError::OwnerRoleReserved);
        }

        let caller = self
            .families
            .find_by_email(caller_email)
            .await?
            .ok_or(FamilyServiceError::FamilyNotFound)?;
        if !caller.is_owner {
            return Err(FamilyServiceError::NotOwner);
        }

        let target = self
            .families
            .find_by_email(target_email)
            .await?
            .ok_or(FamilyServiceError::FamilyNotFound)?;
        if target.family_id != caller.family_id {
            return Err(FamilyServiceError::NotOwner);
        }
        if target.is_owner {
            // The owner row keeps its role; demoting the owner would leave
            // the family without one.
            return Err(FamilyServiceError::OwnerRoleReserved);
        }

        self.families
            .update_role(&caller.family_id, target_email, role)
            .await?;
        Ok(())
    }

    /// Updates the shared baby profile. Any member may do this; the write
    /// fans out across every membership row of the family (see the
    /// repository for the partial-failure semantics).
    pub async fn update_baby_profile(
        &self,
        caller_email: &str,
        baby_name: Option<&str>,
        birth_date: Option<&str>,
    ) -> Result<(), FamilyServiceError> {
        if let Some(name) = baby_name {
            if name.trim().is_empty() {
                return Err(FamilyServiceError::MissingBabyName);
            }
        }
        let membership = self
            .families
            .find_by_email(caller_email)
            .await?
            .ok_or(FamilyServiceError::FamilyNotFound)?;

        self.families
            .update_family_profile(
                &membership.family_id,
                baby_name.map(str::trim),
                birth_date,
            )
            .await?;
        Ok(())
    }

    pub async fn membership_of(
        &self,
        email: &str,
    ) -> Result<Option<FamilyMembership>, FamilyServiceError> {
        Ok(self.families.find_by_email(email).await?)
    }

    pub async fn family_info(&self, email: &str) -> Result<FamilyInfo, FamilyServiceError> {
        let membership = self
            .families
            .find_by_email(email)
            .await?
            .ok_or(FamilyServiceError::FamilyNotFound)?;
        let members = self.families.find_by_family(&membership.family_id).await?;

        Ok(FamilyInfo {
            family_id: membership.family_id,
            baby_name: membership.baby_name,
            birth_date: membership.birth_date,
            members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;
    use crate::repositories::family_repository::MockFamilyRepository;
    use crate::repositories::user_repository::MockUserRepository;
    use mockall::predicate::*;

    fn membership(family_id: &str, email: &str, owner: bool) -> FamilyMembership {
        FamilyMembership {
            family_id: family_id.to_string(),
            user_email: email.to_string(),
            baby_name: "Luna".to_string(),
            is_owner: owner,
            role: if owner {
                FamilyRole::Owner
            } else {
                FamilyRole::Parent
            },
            birth_date: None,
        }
    }

    fn user(email: &str) -> User {
        User {
            email: email.to_string(),
            name: "X".to_string(),
            image: String::new(),
            is_premium: false,
            is_admin: false,
            password_hash: String::new(),
            created_at: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_family_rejects_existing_member() {
        let mut families = MockFamilyRepository::new();
        families
            .expect_find_by_email()
            .with(eq("ana@example.com"))
            .returning(|_| {
                Box::pin(async { Ok(Some(membership("fam-1", "ana@example.com", true))) })
            });

        let service = FamilyService::new(Arc::new(families), Arc::new(MockUserRepository::new()));
        let result = service.create_family("ana@example.com", "Luna", None).await;
        assert!(matches!(result, Err(FamilyServiceError::AlreadyInFamily)));
    }

    #[tokio::test]
    async fn test_invite_rejects_target_in_other_family() {
        let mut families = MockFamilyRepository::new();
        families
            .expect_find_by_email()
            .with(eq("ana@example.com"))
            .returning(|_| {
                Box::pin(async { Ok(Some(membership("fam-1", "ana@example.com", true))) })
            });
        families
            .expect_find_by_email()
            .with(eq("bo@example.com"))
            .returning(|_| {
                Box::pin(async { Ok(Some(membership("fam-2", "bo@example.com", false))) })
            });
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .with(eq("bo@example.com"))
            .returning(|_| Box::pin(async { Ok(Some(user("bo@example.com"))) }));

        let service = FamilyService::new(Arc::new(families), Arc::new(users));
        let result = service
            .invite_user("ana@example.com", "bo@example.com", None)
            .await;
        assert!(matches!(
            result,
            Err(FamilyServiceError::InvitationTargetInvalid)
        ));
    }

    #[tokio::test]
    async fn test_update_user_role_requires_same_family_owner() {
        // Caller owns fam-1, target belongs to fam-2. Being "an owner" is
        // not enough.
        let mut families = MockFamilyRepository::new();
        families
            .expect_find_by_email()
            .with(eq("ana@example.com"))
            .returning(|_| {
                Box::pin(async { Ok(Some(membership("fam-1", "ana@example.com", true))) })
            });
        families
            .expect_find_by_email()
            .with(eq("cy@example.com"))
            .returning(|_| {
                Box::pin(async { Ok(Some(membership("fam-2", "cy@example.com", false))) })
            });

        let service = FamilyService::new(Arc::new(families), Arc::new(MockUserRepository::new()));
        let result = service
            .update_user_role("ana@example.com", "cy@example.com", FamilyRole::Caregiver)
            .await;
        assert!(matches!(result, Err(FamilyServiceError::NotOwner)));
    }

    #[tokio::test]
    async fn test_update_user_role_rejects_non_owner_caller() {
        let mut families = MockFamilyRepository::new();
        families
            .expect_find_by_email()
            .with(eq("bo@example.com"))
            .returning(|_| {
                Box::pin(async { Ok(Some(membership("fam-1", "bo@example.com", false))) })
            });

        let service = FamilyService::new(Arc::new(families), Arc::new(MockUserRepository::new()));
        let result = service
            .update_user_role("bo@example.com", "ana@example.com", FamilyRole::Caregiver)
            .await;
        assert!(matches!(result, Err(FamilyServiceError::NotOwner)));
    }

    #[tokio::test]
    async fn test_update_my_role_cannot_claim_owner() {
        let service = FamilyService::new(
            Arc::new(MockFamilyRepository::new()),
            Arc::new(MockUserRepository::new()),
        );
        let result = service
            .update_my_role("bo@example.com", FamilyRole::Owner)
            .await;
        assert!(matches!(result, Err(FamilyServiceError::OwnerRoleReserved)));
    }
}
