//! Operation routes - audit log with type and date filters

pub mod api;

pub use api::api_operations;
