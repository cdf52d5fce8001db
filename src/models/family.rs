use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a member within a family.
///
/// `Owner` is assigned only at family creation; every later role change,
/// self-service or owner-driven, is restricted to the non-owner roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FamilyRole {
    Owner,
    Parent,
    Grandparent,
    Caregiver,
}

impl FamilyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyRole::Owner => "owner",
            FamilyRole::Parent => "parent",
            FamilyRole::Grandparent => "grandparent",
            FamilyRole::Caregiver => "caregiver",
        }
    }
}

impl FromStr for FamilyRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(FamilyRole::Owner),
            "parent" => Ok(FamilyRole::Parent),
            "grandparent" => Ok(FamilyRole::Grandparent),
            "caregiver" => Ok(FamilyRole::Caregiver),
            other => Err(format!("Unknown family role: {}", other)),
        }
    }
}

impl fmt::Display for FamilyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One membership row: a user's place in a family, with the family-wide
/// baby profile denormalized onto every row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMembership {
    pub family_id: String,
    pub user_email: String,
    pub baby_name: String,
    pub is_owner: bool,
    pub role: FamilyRole,
    pub birth_date: Option<String>,
}
