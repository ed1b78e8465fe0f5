//! Error types for tuitionweb-client

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Unauthorized: token rejected by the payments API")]
    Unauthorized,

    #[error("Request to {path} failed with status {status}")]
    Status { path: String, status: u16 },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Request to {path} timed out")]
    Timeout { path: String },

    #[error("Invalid response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Source is read-only: {operation}")]
    ReadOnly { operation: String },

    #[error("IO error")]
    IoError(#[from] io::Error),
}

impl FetchError {
    /// True when the stored credential must be discarded
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FetchError::Unauthorized)
    }
}
