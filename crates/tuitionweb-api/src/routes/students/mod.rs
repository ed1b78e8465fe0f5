//! Student routes - payment status table and semester statuses

pub mod api;

pub use api::{api_student_semesters, api_students};
