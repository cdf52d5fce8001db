use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
    pub image: String,
    pub is_premium: bool,
    pub is_admin: bool,
    /// Empty for accounts provisioned through an external identity provider.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}
