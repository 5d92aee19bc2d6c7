use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use crate::system::auth::middleware::{require_admin, require_auth, require_manager};
use crate::{handlers, system};

/// All application routes with their role gates. Where one path mixes
/// methods with different gates, the stricter check lives in the handler.
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // AUTH ROUTES (PUBLIC)
        // ========================================
        .route("/api/auth/register", post(system::handlers::auth::register))
        .route("/api/auth/login", post(system::handlers::auth::login))
        // Auth routes (protected)
        .route(
            "/api/auth/profile",
            get(system::handlers::auth::profile).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/auth/password",
            put(system::handlers::auth::update_password).layer(middleware::from_fn(require_auth)),
        )
        // ========================================
        // USER MANAGEMENT
        // ========================================
        .route(
            "/api/users",
            get(system::handlers::users::list).layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/api/users/:id",
            get(system::handlers::users::get_by_id)
                .put(system::handlers::users::update)
                .delete(system::handlers::users::delete)
                .layer(middleware::from_fn(require_manager)),
        )
        // ========================================
        // A001 INVENTORY
        // ========================================
        .route(
            "/api/inventory",
            get(handlers::a001_product::list)
                .post(handlers::a001_product::create)
                .layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/inventory/stats",
            get(handlers::a001_product::stats).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/inventory/categories",
            get(handlers::a001_product::categories).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/inventory/:id",
            get(handlers::a001_product::get_by_id)
                .put(handlers::a001_product::update)
                .delete(handlers::a001_product::delete)
                .layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/inventory/:id/stock",
            patch(handlers::a001_product::adjust_stock).layer(middleware::from_fn(require_manager)),
        )
        // ========================================
        // A002 FINANCE
        // ========================================
        .route(
            "/api/finance",
            get(handlers::a002_transaction::list)
                .post(handlers::a002_transaction::create)
                .layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/api/finance/summary",
            get(handlers::d400_finance_report::summary).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/api/finance/categories",
            get(handlers::d400_finance_report::categories)
                .layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/api/finance/monthly",
            get(handlers::d400_finance_report::monthly).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/api/finance/:id",
            get(handlers::a002_transaction::get_by_id)
                .put(handlers::a002_transaction::update)
                .delete(handlers::a002_transaction::delete)
                .layer(middleware::from_fn(require_manager)),
        )
        // ========================================
        // A003 PROJECTS
        // ========================================
        .route(
            "/api/projects",
            get(handlers::a003_project::list)
                .post(handlers::a003_project::create)
                .layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/projects/stats",
            get(handlers::a003_project::stats).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/projects/:id",
            get(handlers::a003_project::get_by_id)
                .put(handlers::a003_project::update)
                .delete(handlers::a003_project::delete)
                .layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/projects/:id/tasks",
            post(handlers::a003_project::add_task).layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/api/projects/:id/tasks/:task_id",
            put(handlers::a003_project::update_task)
                .delete(handlers::a003_project::delete_task)
                .layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/api/projects/:id/tasks/:task_id/toggle",
            patch(handlers::a003_project::toggle_task).layer(middleware::from_fn(require_auth)),
        )
        // ========================================
        // A004 AI ASSISTANT
        // ========================================
        .route(
            "/api/chat",
            post(handlers::a004_chat::chat).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/chat/analyze",
            get(handlers::a004_chat::analyze).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/chat/sessions",
            get(handlers::a004_chat::list_sessions).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/chat/history/:session_id",
            get(handlers::a004_chat::get_history).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/chat/sessions/:session_id",
            axum::routing::delete(handlers::a004_chat::delete_session)
                .layer(middleware::from_fn(require_auth)),
        )
}
