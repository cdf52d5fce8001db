use crate::models::user::User;
use crate::repositories::{RepositoryError, UserRepository};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Name is required")]
    MissingName,
    #[error("Password too short (minimum 6 characters)")]
    WeakPassword,
    #[error("User not found")]
    UserNotFound,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Default)]
pub struct AdminUpdateRequest {
    pub name: Option<String>,
    pub is_premium: Option<bool>,
    pub is_admin: Option<bool>,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Registers a new account. The duplicate check is a read-then-append
    /// against a store without uniqueness enforcement: two racing
    /// registrations can both pass it, in which case the first appended row
    /// wins all subsequent lookups.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, UserServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(UserServiceError::MissingName);
        }
        self.validate_email(&request.email)?;
        self.validate_password(&request.password)?;

        let password_hash = self.hash_password(&request.password)?;

        let user = User {
            email: request.email.clone(),
            name: name.to_string(),
            image: String::new(),
            is_premium: false,
            is_admin: false,
            password_hash,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        match self.repository.create_user(&user).await {
            Ok(()) => Ok(user),
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(email).await?)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users().await?)
    }

    /// Admin surface: overwrite name and entitlement flags. Each field is
    /// an independent cell write.
    pub async fn admin_update(
        &self,
        email: &str,
        request: AdminUpdateRequest,
    ) -> Result<User, UserServiceError> {
        if let Some(ref name) = request.name {
            if name.trim().is_empty() {
                return Err(UserServiceError::MissingName);
            }
            self.map_not_found(self.repository.update_name(email, name.trim()).await)?;
        }
        if let Some(premium) = request.is_premium {
            self.map_not_found(self.repository.set_premium(email, premium).await)?;
        }
        if let Some(admin) = request.is_admin {
            self.map_not_found(self.repository.set_admin(email, admin).await)?;
        }

        self.repository
            .find_by_email(email)
            .await?
            .ok_or(UserServiceError::UserNotFound)
    }

    fn map_not_found(
        &self,
        result: Result<(), RepositoryError>,
    ) -> Result<(), UserServiceError> {
        match result {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    fn validate_email(&self, email: &str) -> Result<(), UserServiceError> {
        if !email.contains('@') || email.len() > 255 || email.is_empty() {
            return Err(UserServiceError::InvalidEmail);
        }
        Ok(())
    }

    fn validate_password(&self, password: &str) -> Result<(), UserServiceError> {
        if password.len() < 6 {
            return Err(UserServiceError::WeakPassword);
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, UserServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserServiceError::HashingError(e.to_string()))
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        } else {
            false
        }
    }
}
