//! Report routes - per-semester payment report

pub mod api;

pub use api::api_payment_report;
