//! Read-only `TuitionSource` backed by JSON exports on disk
//!
//! Expected layout under the data directory:
//! - users.json       (`/users/all`)
//! - semesters.json   (`/infra/semesters`)
//! - groups.json      (`/infra/groups`)
//! - operations.json  (`/operations/show_list`)
//! - self.json        (`/users/self`, optional)
//!
//! A missing collection file reads as an empty list.

use crate::error::FetchError;
use crate::types::*;
use crate::TuitionSource;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, FetchError> {
        let path = self.dir.join(file);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!(target: "tuitionweb::client", "snapshot file missing: {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(FetchError::IoError(e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| FetchError::Decode {
                path: path.to_string_lossy().to_string(),
                message: e.to_string(),
            })
    }

    async fn read_list<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, FetchError> {
        Ok(self.read(file).await?.unwrap_or_default())
    }

    fn read_only<T>(operation: &str) -> Result<T, FetchError> {
        Err(FetchError::ReadOnly {
            operation: operation.to_string(),
        })
    }
}

#[async_trait]
impl TuitionSource for SnapshotSource {
    async fn current_user(&self) -> Result<UserRecord, FetchError> {
        self.read("self.json").await?.ok_or(FetchError::NotFound {
            resource: "self.json".to_string(),
        })
    }

    async fn users(&self) -> Result<Vec<UserRecord>, FetchError> {
        self.read_list("users.json").await
    }

    async fn students(&self) -> Result<Vec<UserRecord>, FetchError> {
        let users: Vec<UserRecord> = self.read_list("users.json").await?;
        Ok(users.into_iter().filter(|u| u.role == "student").collect())
    }

    async fn semesters(&self) -> Result<Vec<SemesterRecord>, FetchError> {
        self.read_list("semesters.json").await
    }

    async fn groups(&self) -> Result<Vec<GroupRecord>, FetchError> {
        self.read_list("groups.json").await
    }

    async fn operations(&self) -> Result<Vec<OperationRecord>, FetchError> {
        self.read_list("operations.json").await
    }

    async fn create_transaction(&self, _payment: &NewTransaction) -> Result<TransactionRecord, FetchError> {
        Self::read_only("create_transaction")
    }

    async fn create_user(&self, _user: &NewUser) -> Result<UserRecord, FetchError> {
        Self::read_only("create_user")
    }

    async fn edit_user(&self, _user_id: &str, _edit: &UserEdit) -> Result<UserRecord, FetchError> {
        Self::read_only("edit_user")
    }

    async fn delete_user(&self, _user_id: &str) -> Result<(), FetchError> {
        Self::read_only("delete_user")
    }

    async fn create_group(&self, _name: &str) -> Result<GroupRecord, FetchError> {
        Self::read_only("create_group")
    }

    async fn rename_group(&self, _group_id: &str, _name: &str) -> Result<GroupRecord, FetchError> {
        Self::read_only("rename_group")
    }

    async fn delete_group(&self, _group_id: &str) -> Result<(), FetchError> {
        Self::read_only("delete_group")
    }

    async fn create_semester(&self, _name: &str) -> Result<SemesterRecord, FetchError> {
        Self::read_only("create_semester")
    }

    async fn rename_semester(&self, _semester_id: &str, _name: &str) -> Result<SemesterRecord, FetchError> {
        Self::read_only("rename_semester")
    }

    async fn delete_semester(&self, _semester_id: &str) -> Result<(), FetchError> {
        Self::read_only("delete_semester")
    }

    async fn add_to_group(&self, _group_id: &str, _user_id: &str) -> Result<GroupRecord, FetchError> {
        Self::read_only("add_to_group")
    }

    async fn remove_from_group(&self, _user_id: &str) -> Result<(), FetchError> {
        Self::read_only("remove_from_group")
    }
}
