//! Students API endpoints

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use tuitionweb_core::{Page, SemesterStatus, StudentQuery, StudentRow};

/// Students with total paid and per-semester paid flags
pub async fn api_students(state: State<AppState>, query: Query<StudentQuery>) -> Json<Page<StudentRow>> {
    let dashboard = state.dashboard.read().await;
    Json(dashboard.students_page(&query))
}

/// One student's semesters, with the receipt transaction where paid
pub async fn api_student_semesters(
    state: State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<SemesterStatus>>> {
    let dashboard = state.dashboard.read().await;
    let statuses = dashboard.student_semesters(&id).map_err(ApiError::from)?;
    Ok(Json(statuses))
}
