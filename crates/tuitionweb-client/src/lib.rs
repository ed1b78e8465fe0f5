//! Payments API client
//!
//! Everything the dashboards show lives behind the remote payments API.
//! `TuitionSource` is the seam: `HttpSource` talks to the live API,
//! `SnapshotSource` reads JSON exports of the same endpoints from disk.

use async_trait::async_trait;
use std::sync::Arc;

pub mod error;
pub mod http;
pub mod snapshot;
pub mod types;

pub use error::FetchError;
pub use http::HttpSource;
pub use snapshot::SnapshotSource;
pub use types::{
    GroupRecord, InitiatorRecord, NewTransaction, NewUser, OperationRecord, SemesterRecord,
    TransactionRecord, UserEdit, UserRecord,
};

/// Source reference type
pub type SourceRef = Arc<dyn TuitionSource>;

/// Read and write access to the payments API
#[async_trait]
pub trait TuitionSource: Send + Sync {
    /// The user the token belongs to
    async fn current_user(&self) -> Result<UserRecord, FetchError>;

    /// Every user, any role
    async fn users(&self) -> Result<Vec<UserRecord>, FetchError>;

    /// Users with the student role, transactions embedded
    async fn students(&self) -> Result<Vec<UserRecord>, FetchError>;

    async fn semesters(&self) -> Result<Vec<SemesterRecord>, FetchError>;

    async fn groups(&self) -> Result<Vec<GroupRecord>, FetchError>;

    /// The audit log
    async fn operations(&self) -> Result<Vec<OperationRecord>, FetchError>;

    /// Pay for a semester as the current user
    async fn create_transaction(&self, payment: &NewTransaction) -> Result<TransactionRecord, FetchError>;

    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, FetchError>;

    async fn edit_user(&self, user_id: &str, edit: &UserEdit) -> Result<UserRecord, FetchError>;

    async fn delete_user(&self, user_id: &str) -> Result<(), FetchError>;

    async fn create_group(&self, name: &str) -> Result<GroupRecord, FetchError>;

    async fn rename_group(&self, group_id: &str, name: &str) -> Result<GroupRecord, FetchError>;

    async fn delete_group(&self, group_id: &str) -> Result<(), FetchError>;

    async fn create_semester(&self, name: &str) -> Result<SemesterRecord, FetchError>;

    async fn rename_semester(&self, semester_id: &str, name: &str) -> Result<SemesterRecord, FetchError>;

    async fn delete_semester(&self, semester_id: &str) -> Result<(), FetchError>;

    async fn add_to_group(&self, group_id: &str, user_id: &str) -> Result<GroupRecord, FetchError>;

    async fn remove_from_group(&self, user_id: &str) -> Result<(), FetchError>;
}
