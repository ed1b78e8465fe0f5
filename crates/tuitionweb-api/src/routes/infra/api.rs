//! Semesters and groups API endpoints
//!
//! Endpoints:
//! - api_semesters / api_groups: Lists (JSON)
//! - api_semester_create / api_group_create: Create by name
//! - api_semester_rename / api_group_rename: Rename
//! - api_semester_delete / api_group_delete: Delete
//! - api_group_add_member: Move a user into a group

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tuitionweb_core::{Group, Semester};

/// Body of create and rename requests
#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

/// Semesters ordered by id
pub async fn api_semesters(state: State<AppState>) -> Json<Vec<Semester>> {
    let dashboard = state.dashboard.read().await;
    Json(dashboard.semesters())
}

pub async fn api_semester_create(
    state: State<AppState>,
    Json(request): Json<NameRequest>,
) -> ApiResult<(StatusCode, Json<Semester>)> {
    let mut dashboard = state.dashboard.write().await;
    let semester = dashboard
        .create_semester(&request.name)
        .await
        .map_err(ApiError::logged("create_semester"))?;
    Ok((StatusCode::CREATED, Json(semester)))
}

pub async fn api_semester_rename(
    state: State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<NameRequest>,
) -> ApiResult<Json<Semester>> {
    let mut dashboard = state.dashboard.write().await;
    let semester = dashboard
        .rename_semester(&id, &request.name)
        .await
        .map_err(ApiError::logged("rename_semester"))?;
    Ok(Json(semester))
}

pub async fn api_semester_delete(state: State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut dashboard = state.dashboard.write().await;
    dashboard
        .delete_semester(&id)
        .await
        .map_err(ApiError::logged("delete_semester"))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn api_groups(state: State<AppState>) -> Json<Vec<Group>> {
    let dashboard = state.dashboard.read().await;
    Json(dashboard.groups().to_vec())
}

pub async fn api_group_create(
    state: State<AppState>,
    Json(request): Json<NameRequest>,
) -> ApiResult<(StatusCode, Json<Group>)> {
    let mut dashboard = state.dashboard.write().await;
    let group = dashboard
        .create_group(&request.name)
        .await
        .map_err(ApiError::logged("create_group"))?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn api_group_rename(
    state: State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<NameRequest>,
) -> ApiResult<Json<Group>> {
    let mut dashboard = state.dashboard.write().await;
    let group = dashboard
        .rename_group(&id, &request.name)
        .await
        .map_err(ApiError::logged("rename_group"))?;
    Ok(Json(group))
}

pub async fn api_group_delete(state: State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut dashboard = state.dashboard.write().await;
    dashboard
        .delete_group(&id)
        .await
        .map_err(ApiError::logged("delete_group"))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn api_group_add_member(
    state: State<AppState>,
    Path((group_id, user_id)): Path<(String, String)>,
) -> ApiResult<Json<Group>> {
    let mut dashboard = state.dashboard.write().await;
    let group = dashboard
        .add_to_group(&group_id, &user_id)
        .await
        .map_err(ApiError::logged("add_to_group"))?;
    Ok(Json(group))
}
