pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;
pub mod store;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use config::{SessionConfig, Settings};
use repositories::{
    SheetActivityRepository, SheetCommentRepository, SheetFamilyRepository, SheetUserRepository,
};
use services::{
    ActivityService, AuthService, CommentService, EntitlementService, FamilyService,
    PaymentService, UserService,
};
use std::sync::Arc;
use store::RowStore;
use tower_sessions::MemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub entitlement_service: Arc<EntitlementService>,
    pub family_service: Arc<FamilyService>,
    pub activity_service: Arc<ActivityService>,
    pub comment_service: Arc<CommentService>,
    pub payment_service: Arc<PaymentService>,
    pub settings: Settings,
}

impl AppState {
    /// Wires repositories and services over one row store.
    pub fn new(store: Arc<dyn RowStore>, settings: Settings) -> Self {
        let user_repository = Arc::new(SheetUserRepository::new(store.clone()));
        let family_repository = Arc::new(SheetFamilyRepository::new(store.clone()));
        let activity_repository = Arc::new(SheetActivityRepository::new(store.clone()));
        let comment_repository = Arc::new(SheetCommentRepository::new(store));

        let entitlement_service = Arc::new(EntitlementService::new(
            user_repository.clone(),
            comment_repository.clone(),
            settings.timezone,
            settings.free_daily_comment_limit,
        ));

        Self {
            user_service: Arc::new(UserService::new(user_repository.clone())),
            auth_service: Arc::new(AuthService::new(user_repository.clone())),
            family_service: Arc::new(FamilyService::new(
                family_repository,
                user_repository.clone(),
            )),
            activity_service: Arc::new(ActivityService::new(activity_repository)),
            comment_service: Arc::new(CommentService::new(
                comment_repository,
                entitlement_service.clone(),
            )),
            payment_service: Arc::new(PaymentService::new(user_repository, settings.clone())),
            entitlement_service,
            settings,
        }
    }
}

/// Full application router, session layer included.
pub fn app(state: AppState) -> Router {
    let premium_routes = Router::new()
        .route(
            "/family",
            get(handlers::get_family_handler).post(handlers::family_action_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_premium,
        ));

    let admin_routes = Router::new()
        .route("/admin/users", get(handlers::list_users_handler))
        .route(
            "/admin/users/{email}",
            put(handlers::admin_update_user_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_admin,
        ));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::handlers::me_handler))
        .route("/auth/logout", get(auth::handlers::logout_handler))
        .route(
            "/activities",
            get(handlers::list_activities_handler).post(handlers::create_activity_handler),
        )
        .route(
            "/activities/{timestamp}",
            put(handlers::update_activity_handler).delete(handlers::delete_activity_handler),
        )
        .route(
            "/child-profile",
            get(handlers::get_child_profile_handler).post(handlers::save_child_profile_handler),
        )
        .route(
            "/community/comments",
            post(handlers::create_comment_handler),
        )
        .route(
            "/payments/create-preference",
            post(handlers::create_preference_handler),
        )
        .merge(premium_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(auth::middleware::require_auth));

    let session_store = MemoryStore::default();
    let session_layer = SessionConfig::from_env().create_layer(session_store);

    Router::new()
        .route("/auth/register", post(auth::handlers::register_handler))
        .route("/auth/login", post(auth::handlers::login_handler))
        // Provider webhook: unauthenticated by contract.
        .route(
            "/payments/webhook",
            post(handlers::payment_webhook_handler),
        )
        .merge(protected_routes)
        .layer(session_layer)
        .with_state(state)
}
