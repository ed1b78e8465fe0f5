//! Route modules for the API server
//!
//! Each module follows the same layout:
//! - mod.rs: module declaration and exports
//! - api.rs: JSON endpoints
//!
//! - users: admin user list and user management
//! - students: student table and per-student semester statuses
//! - payments: accountant payment feed and paying for a semester
//! - operations: audit log
//! - reports: payment report
//! - infra: semesters, groups and group membership

pub mod infra;
pub mod operations;
pub mod payments;
pub mod reports;
pub mod students;
pub mod users;
