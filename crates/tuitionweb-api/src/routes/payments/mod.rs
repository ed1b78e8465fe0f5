//! Payment routes - accountant feed and paying for a semester

pub mod api;

pub use api::{api_payment_create, api_payments};
