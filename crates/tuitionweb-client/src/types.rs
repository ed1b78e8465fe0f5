//! Records exchanged with the payments API
//!
//! Field names follow the API's JSON exactly. Enumerations (role, operation
//! type) and timestamps are kept as strings here and interpreted by the core.

use serde::{Deserialize, Serialize};

/// A user as returned by `/users/*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: String,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    /// One of student, observer, accountant, admin
    pub role: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

/// A completed tuition payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub user_id: String,
    pub semester_id: String,
    pub amount: i64,
    #[serde(default)]
    pub comment: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterRecord {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

/// Audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub comment: String,
    pub created_at: String,
    pub initiator: InitiatorRecord,
}

/// Snapshot of the acting user stored with an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiatorRecord {
    pub id: String,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: String,
    pub role: String,
}

// ==================== Request Payloads ====================

/// Body of `POST /users/new`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub role: String,
    pub phone: String,
    pub login: String,
    pub password: String,
}

/// Body of `PUT /users/edit/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEdit {
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub phone: String,
}

/// Body of `POST /operations/new_transaction`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub semester_id: String,
    pub amount: i64,
}
