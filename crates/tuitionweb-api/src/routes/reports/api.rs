//! Reports API endpoints

use crate::AppState;
use axum::extract::State;
use axum::Json;
use tuitionweb_core::PaymentReport;

pub async fn api_payment_report(state: State<AppState>) -> Json<PaymentReport> {
    let dashboard = state.dashboard.read().await;
    Json(dashboard.payment_report())
}
