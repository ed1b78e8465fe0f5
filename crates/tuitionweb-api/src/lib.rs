//! JSON API over the dashboard snapshot
//!
//! Routes are organized into modules:
//! - routes::users: Admin user list and management
//! - routes::students: Student payment table
//! - routes::payments: Payment feed and paying
//! - routes::operations: Audit log
//! - routes::reports: Payment report
//! - routes::infra: Semesters and groups

pub mod error;
pub mod routes;

use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tuitionweb_config::Config;
use tuitionweb_core::{Dashboard, DashboardSummary};

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<RwLock<Dashboard>>,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::infra::{
        api_group_add_member, api_group_create, api_group_delete, api_group_rename, api_groups,
        api_semester_create, api_semester_delete, api_semester_rename, api_semesters,
    };
    use routes::operations::api_operations;
    use routes::payments::{api_payment_create, api_payments};
    use routes::reports::api_payment_report;
    use routes::students::{api_student_semesters, api_students};
    use routes::users::{api_user_create, api_user_delete, api_user_edit, api_user_leave_group, api_users};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/summary", get(api_summary))
        .route("/api/reload", post(api_reload))
        // Listings
        .route("/api/users", get(api_users).post(api_user_create))
        .route("/api/users/:id", put(api_user_edit).delete(api_user_delete))
        .route("/api/users/:id/group", delete(api_user_leave_group))
        .route("/api/students", get(api_students))
        .route("/api/students/:id/semesters", get(api_student_semesters))
        .route("/api/payments", get(api_payments).post(api_payment_create))
        .route("/api/operations", get(api_operations))
        .route("/api/reports/payments", get(api_payment_report))
        // Semesters and groups
        .route("/api/semesters", get(api_semesters).post(api_semester_create))
        .route("/api/semesters/:id", put(api_semester_rename).delete(api_semester_delete))
        .route("/api/groups", get(api_groups).post(api_group_create))
        .route("/api/groups/:id", put(api_group_rename).delete(api_group_delete))
        .route("/api/groups/:id/members/:user_id", put(api_group_add_member))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Snapshot counts and the signed-in user
async fn api_summary(state: State<AppState>) -> Json<DashboardSummary> {
    let dashboard = state.dashboard.read().await;
    Json(dashboard.summary())
}

/// Re-fetch every collection from the source
async fn api_reload(state: State<AppState>) -> ApiResult<Json<DashboardSummary>> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.load().await.map_err(ApiError::logged("reload"))?;
    Ok(Json(dashboard.summary()))
}

/// Start the HTTP server
///
/// Binds `server.host:server.port` and serves until the process stops.
pub async fn start_server(config: &Config, dashboard: Arc<RwLock<Dashboard>>) -> std::io::Result<()> {
    let addr = config.bind_addr();
    let router = create_router(AppState { dashboard });

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting tuitionweb server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /api/users, /api/students (listings)");
    log::info!("  - /api/payments, /api/operations (feeds)");
    log::info!("  - /api/reports/payments (payment report)");
    log::info!("  - /api/semesters, /api/groups (infrastructure)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped");
    Ok(())
}

// ==================== Tests ====================
