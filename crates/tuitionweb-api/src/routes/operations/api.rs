//! Operations API endpoints

use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use tuitionweb_core::{Operation, OperationQuery, Page};

/// Audit log filtered by text, type and date bucket
pub async fn api_operations(state: State<AppState>, query: Query<OperationQuery>) -> Json<Page<Operation>> {
    let dashboard = state.dashboard.read().await;
    Json(dashboard.operations_page(&query))
}
