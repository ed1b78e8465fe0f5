//! Users API endpoints
//!
//! Endpoints:
//! - api_users: Users filtered by name and role (JSON)
//! - api_user_create: Create a user
//! - api_user_edit: Edit name and phone
//! - api_user_delete: Delete a user
//! - api_user_leave_group: Remove a user from their group

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tuitionweb_core::{Page, User, UserDraft, UserEditDraft, UserQuery};

pub async fn api_users(state: State<AppState>, query: Query<UserQuery>) -> Json<Page<User>> {
    let dashboard = state.dashboard.read().await;
    Json(dashboard.users_page(&query))
}

pub async fn api_user_create(
    state: State<AppState>,
    Json(draft): Json<UserDraft>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let mut dashboard = state.dashboard.write().await;
    let user = dashboard
        .create_user(&draft)
        .await
        .map_err(ApiError::logged("create_user"))?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn api_user_edit(
    state: State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<UserEditDraft>,
) -> ApiResult<Json<User>> {
    let mut dashboard = state.dashboard.write().await;
    let user = dashboard
        .edit_user(&id, &draft)
        .await
        .map_err(ApiError::logged("edit_user"))?;
    Ok(Json(user))
}

pub async fn api_user_delete(state: State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut dashboard = state.dashboard.write().await;
    dashboard
        .delete_user(&id)
        .await
        .map_err(ApiError::logged("delete_user"))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn api_user_leave_group(state: State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut dashboard = state.dashboard.write().await;
    dashboard
        .remove_from_group(&id)
        .await
        .map_err(ApiError::logged("remove_from_group"))?;
    Ok(StatusCode::NO_CONTENT)
}
