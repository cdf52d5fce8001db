pub mod activity_handlers;
pub mod admin_handlers;
pub mod child_profile_handlers;
pub mod comment_handlers;
pub mod family_handlers;
pub mod payment_handlers;

pub use activity_handlers::{
    create_activity_handler, delete_activity_handler, list_activities_handler,
    update_activity_handler,
};
pub use admin_handlers::{admin_update_user_handler, list_users_handler};
pub use child_profile_handlers::{get_child_profile_handler, save_child_profile_handler};
pub use comment_handlers::create_comment_handler;
pub use family_handlers::{family_action_handler, get_family_handler};
pub use payment_handlers::{create_preference_handler, payment_webhook_handler};
