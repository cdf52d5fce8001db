pub mod activity_service;
pub mod auth_service;
pub mod comment_service;
pub mod entitlement_service;
pub mod family_service;
pub mod payment_service;
pub mod user_service;

pub use activity_service::ActivityService;
pub use auth_service::AuthService;
pub use comment_service::CommentService;
pub use entitlement_service::{EntitlementService, QuotaDecision};
pub use family_service::FamilyService;
pub use payment_service::PaymentService;
pub use user_service::UserService;
