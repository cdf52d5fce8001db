pub mod activity;
pub mod comment;
pub mod family;
pub mod user;

pub use activity::{Activity, ActivityType};
pub use comment::Comment;
pub use family::{FamilyMembership, FamilyRole};
pub use user::User;
