//! Payments API endpoints

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use tuitionweb_core::{Page, PaymentDraft, PaymentEntry, PaymentQuery, Transaction};

/// Every student payment, newest first by default
pub async fn api_payments(state: State<AppState>, query: Query<PaymentQuery>) -> Json<Page<PaymentEntry>> {
    let dashboard = state.dashboard.read().await;
    Json(dashboard.payments_page(&query))
}

/// Pay for a semester as the current user
pub async fn api_payment_create(
    state: State<AppState>,
    Json(draft): Json<PaymentDraft>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let mut dashboard = state.dashboard.write().await;
    let transaction = dashboard.pay(&draft).await.map_err(ApiError::logged("pay"))?;
    Ok((StatusCode::CREATED, Json(transaction)))
}
