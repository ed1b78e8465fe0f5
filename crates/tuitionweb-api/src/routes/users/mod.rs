//! User routes - admin user list and management

pub mod api;

pub use api::{api_user_create, api_user_delete, api_user_edit, api_user_leave_group, api_users};
