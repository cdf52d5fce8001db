use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of loggable activity kinds. Unknown values are rejected
/// before any store write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Feeding,
    Sleep,
    Diaper,
    Milestone,
    Potty,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Feeding => "feeding",
            ActivityType::Sleep => "sleep",
            ActivityType::Diaper => "diaper",
            ActivityType::Milestone => "milestone",
            ActivityType::Potty => "potty",
        }
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feeding" => Ok(ActivityType::Feeding),
            "sleep" => Ok(ActivityType::Sleep),
            "diaper" => Ok(ActivityType::Diaper),
            "milestone" => Ok(ActivityType::Milestone),
            "potty" => Ok(ActivityType::Potty),
            other => Err(format!("Unknown activity type: {}", other)),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logged event. There is no surrogate key: identity is the pair
/// (user_email, timestamp), matched by exact string equality on the value
/// the timestamp had before any edit in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub user_email: String,
    pub baby_name: String,
    pub activity_type: ActivityType,
    pub details: String,
    pub timestamp: String,
}
