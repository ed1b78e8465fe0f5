//! Core data models for the dashboards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tuitionweb_client::{
    GroupRecord, InitiatorRecord, OperationRecord, SemesterRecord, TransactionRecord, UserRecord,
};

use crate::error::CoreError;
use crate::time::{parse_timestamp, Timestamped};
use crate::types::{OperationType, Role};

/// Join name parts the way every list displays them
pub fn full_name(surname: &str, name: &str, patronymic: &str) -> String {
    [surname, name, patronymic]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A completed tuition payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub semester_id: String,
    /// Whole currency units
    pub amount: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = CoreError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let created_at = parse_timestamp(&record.created_at).ok_or_else(|| CoreError::InvalidFormat {
            message: format!("transaction {}: bad timestamp '{}'", record.id, record.created_at),
        })?;
        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            semester_id: record.semester_id,
            amount: record.amount,
            comment: record.comment,
            created_at,
        })
    }
}

impl Timestamped for Transaction {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// User information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub role: Role,
    pub phone: String,
    pub login: String,
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    /// Payments made by this user (students only)
    pub transactions: Vec<Transaction>,
}

impl User {
    /// "Surname Name Patronymic"
    pub fn full_name(&self) -> String {
        full_name(&self.surname, &self.name, &self.patronymic)
    }

    /// At least one payment exists for the semester
    pub fn has_paid(&self, semester_id: &str) -> bool {
        self.transactions.iter().any(|t| t.semester_id == semester_id)
    }

    /// First payment recorded for the semester
    pub fn payment_for(&self, semester_id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.semester_id == semester_id)
    }

    /// Sum of every payment
    pub fn total_paid(&self) -> i64 {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    pub fn has_any_payment(&self) -> bool {
        !self.transactions.is_empty()
    }
}

impl TryFrom<UserRecord> for User {
    type Error = CoreError;

    /// Transactions with unreadable timestamps are dropped with a warning
    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let role = record.role.parse::<Role>().map_err(|message| CoreError::InvalidFormat {
            message: format!("user {}: {}", record.id, message),
        })?;

        let mut transactions = Vec::with_capacity(record.transactions.len());
        for tx in record.transactions {
            match Transaction::try_from(tx) {
                Ok(tx) => transactions.push(tx),
                Err(e) => log::warn!(target: "tuitionweb::core", "skipping payment of user {}: {}", record.id, e),
            }
        }

        Ok(Self {
            id: record.id,
            name: record.name,
            surname: record.surname,
            patronymic: record.patronymic,
            role,
            phone: record.phone,
            login: record.login,
            group_id: record.group_id,
            group_name: record.group_name,
            transactions,
        })
    }
}

/// Billing period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    pub id: String,
    pub name: String,
}

impl From<SemesterRecord> for Semester {
    fn from(record: SemesterRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
        }
    }
}

/// Semesters ordered by id, which the API hands out in creation order
pub fn sorted_semesters(semesters: &[Semester]) -> Vec<Semester> {
    let mut sorted = semesters.to_vec();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    sorted
}

/// Student group with a snapshot of its members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub users: Vec<User>,
}

impl TryFrom<GroupRecord> for Group {
    type Error = CoreError;

    fn try_from(record: GroupRecord) -> Result<Self, Self::Error> {
        let mut users = Vec::with_capacity(record.users.len());
        for user in record.users {
            match User::try_from(user) {
                Ok(user) => users.push(user),
                Err(e) => log::warn!(target: "tuitionweb::core", "skipping member of group {}: {}", record.id, e),
            }
        }
        Ok(Self {
            id: record.id,
            name: record.name,
            users,
        })
    }
}

/// Who performed an operation, as recorded at the time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Initiator {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub role: Role,
}

impl Initiator {
    pub fn full_name(&self) -> String {
        full_name(&self.surname, &self.name, &self.patronymic)
    }
}

impl TryFrom<InitiatorRecord> for Initiator {
    type Error = CoreError;

    fn try_from(record: InitiatorRecord) -> Result<Self, Self::Error> {
        let role = record.role.parse::<Role>().map_err(|message| CoreError::InvalidFormat {
            message: format!("initiator {}: {}", record.id, message),
        })?;
        Ok(Self {
            id: record.id,
            name: record.name,
            surname: record.surname,
            patronymic: record.patronymic,
            role,
        })
    }
}

/// Audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OperationType,
    pub user_id: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub initiator: Initiator,
}

impl TryFrom<OperationRecord> for Operation {
    type Error = CoreError;

    fn try_from(record: OperationRecord) -> Result<Self, Self::Error> {
        let kind = record.kind.parse::<OperationType>().map_err(|message| CoreError::InvalidFormat {
            message: format!("operation {}: {}", record.id, message),
        })?;
        let created_at = parse_timestamp(&record.created_at).ok_or_else(|| CoreError::InvalidFormat {
            message: format!("operation {}: bad timestamp '{}'", record.id, record.created_at),
        })?;
        Ok(Self {
            id: record.id,
            kind,
            user_id: record.user_id,
            comment: record.comment,
            created_at,
            initiator: Initiator::try_from(record.initiator)?,
        })
    }
}

impl Timestamped for Operation {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Student summary attached to a payment in the accountant feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerRef {
    pub id: String,
    pub full_name: String,
    pub group_name: Option<String>,
}

impl From<&User> for PayerRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name(),
            group_name: user.group_name.clone(),
        }
    }
}

/// One payment paired with the student who made it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEntry {
    pub transaction: Transaction,
    pub student: PayerRef,
}

impl Timestamped for PaymentEntry {
    fn created_at(&self) -> DateTime<Utc> {
        self.transaction.created_at
    }
}

/// Flatten every student's payments into one feed, in student order
pub fn payment_feed(students: &[User]) -> Vec<PaymentEntry> {
    students
        .iter()
        .flat_map(|student| {
            let payer = PayerRef::from(student);
            student.transactions.iter().map(move |tx| PaymentEntry {
                transaction: tx.clone(),
                student: payer.clone(),
            })
        })
        .collect()
}
