//! Dashboard snapshot, listing engine and payment reports
//!
//! `Dashboard` keeps an in-memory copy of the payments API collections and
//! answers every dashboard query from it. Writes go to the source and then
//! refresh the collections they touch.

pub mod error;
pub mod listing;
pub mod models;
pub mod reports;
pub mod time;
pub mod types;
pub mod validation;

use serde::{Deserialize, Serialize};
use tuitionweb_client::{FetchError, SourceRef};
use tuitionweb_config::{Config, DateRange, SortDirection};

pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use listing::{Listing, Page, Searchable};
pub use models::{
    full_name, payment_feed, sorted_semesters, Group, Initiator, Operation, PayerRef, PaymentEntry,
    Semester, Transaction, User,
};
pub use reports::{PaymentReport, SemesterStatus, SemesterSummary, StudentRow};
pub use time::{offset_from_hours, TimeContext, Timestamped};
pub use types::{OperationType, Role};
pub use validation::{FieldError, PaymentDraft, UserDraft, UserEditDraft};

/// Collections mirrored from the payments API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    CurrentUser,
    Users,
    Students,
    Semesters,
    Groups,
    Operations,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::CurrentUser,
        Collection::Users,
        Collection::Students,
        Collection::Semesters,
        Collection::Groups,
        Collection::Operations,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::CurrentUser => "current user",
            Collection::Users => "users",
            Collection::Students => "students",
            Collection::Semesters => "semesters",
            Collection::Groups => "groups",
            Collection::Operations => "operations",
        }
    }
}

/// In-memory snapshot of the remote collections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardData {
    pub current_user: Option<User>,
    pub users: Vec<User>,
    pub students: Vec<User>,
    pub semesters: Vec<Semester>,
    pub groups: Vec<Group>,
    pub operations: Vec<Operation>,
    /// Collections whose last fetch failed and are shown empty
    pub degraded: Vec<Collection>,
}

impl DashboardData {
    fn mark(&mut self, collection: Collection, loaded: bool) {
        self.degraded.retain(|c| *c != collection);
        if !loaded {
            self.degraded.push(collection);
        }
    }
}

/// Record counts for the summary endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub current_user: Option<PayerRef>,
    pub current_role: Option<Role>,
    pub users: usize,
    pub students: usize,
    pub semesters: usize,
    pub groups: usize,
    pub operations: usize,
    pub degraded: Vec<Collection>,
    pub currency: String,
}

fn default_page() -> usize {
    1
}

/// Admin user list query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub q: String,
    pub role: Option<Role>,
    #[serde(default = "default_page")]
    pub page: usize,
    pub page_size: Option<usize>,
}

/// Student table query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_page")]
    pub page: usize,
    pub page_size: Option<usize>,
}

/// Accountant payment feed query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentQuery {
    #[serde(default)]
    pub q: String,
    pub sort: Option<SortDirection>,
    #[serde(default = "default_page")]
    pub page: usize,
    pub page_size: Option<usize>,
}

/// Audit log query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationQuery {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "type")]
    pub kind: Option<OperationType>,
    pub range: Option<DateRange>,
    pub sort: Option<SortDirection>,
    #[serde(default = "default_page")]
    pub page: usize,
    pub page_size: Option<usize>,
}

/// Keep the fetched value, degrade on failure, abort on 401
fn settle<T>(collection: Collection, result: Result<T, FetchError>) -> CoreResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(FetchError::Unauthorized) => Err(CoreError::Unauthorized),
        Err(e) => {
            log::warn!(target: "tuitionweb::core", "Failed to load {}: {}", collection.name(), e);
            Ok(None)
        }
    }
}

/// Convert records, dropping the ones that cannot be interpreted
fn convert_all<R, T>(collection: Collection, records: Vec<R>, convert: impl Fn(R) -> CoreResult<T>) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match convert(record) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!(target: "tuitionweb::core", "Skipping record in {}: {}", collection.name(), e);
                None
            }
        })
        .collect()
}

/// Main dashboard structure
pub struct Dashboard {
    config: Config,
    source: SourceRef,
    data: DashboardData,
}

impl Dashboard {
    /// Create an empty dashboard; call `load` to fill it
    pub fn new(config: Config, source: SourceRef) -> Self {
        Self {
            config,
            source,
            data: DashboardData::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    /// Fetch every collection
    ///
    /// A failing collection is left empty and listed in `degraded`. A 401
    /// clears the whole snapshot and returns `Unauthorized`.
    pub async fn load(&mut self) -> CoreResult<()> {
        self.data = DashboardData::default();
        self.refresh(&Collection::ALL).await?;
        log::info!(
            target: "tuitionweb::core",
            "Loaded {} users, {} students, {} semesters, {} groups, {} operations",
            self.data.users.len(),
            self.data.students.len(),
            self.data.semesters.len(),
            self.data.groups.len(),
            self.data.operations.len()
        );
        Ok(())
    }

    /// Re-fetch the given collections in place
    pub async fn refresh(&mut self, collections: &[Collection]) -> CoreResult<()> {
        let mut data = std::mem::take(&mut self.data);
        for &collection in collections {
            if let Err(e) = self.fetch_into(collection, &mut data).await {
                log::warn!(target: "tuitionweb::core", "Clearing dashboard: {}", e);
                return Err(e);
            }
        }
        self.data = data;
        Ok(())
    }

    async fn fetch_into(&self, collection: Collection, data: &mut DashboardData) -> CoreResult<()> {
        let source = self.source.as_ref();
        let loaded = match collection {
            Collection::CurrentUser => {
                let record = settle(collection, source.current_user().await)?;
                let loaded = record.is_some();
                data.current_user = record
                    .map(|r| convert_all(collection, vec![r], User::try_from))
                    .and_then(|mut users| users.pop());
                loaded
            }
            Collection::Users => {
                let records = settle(collection, source.users().await)?;
                let loaded = records.is_some();
                data.users = convert_all(collection, records.unwrap_or_default(), User::try_from);
                loaded
            }
            Collection::Students => {
                let records = settle(collection, source.students().await)?;
                let loaded = records.is_some();
                data.students = convert_all(collection, records.unwrap_or_default(), User::try_from);
                loaded
            }
            Collection::Semesters => {
                let records = settle(collection, source.semesters().await)?;
                let loaded = records.is_some();
                data.semesters = convert_all(collection, records.unwrap_or_default(), |r| Ok(Semester::from(r)));
                loaded
            }
            Collection::Groups => {
                let records = settle(collection, source.groups().await)?;
                let loaded = records.is_some();
                data.groups = convert_all(collection, records.unwrap_or_default(), Group::try_from);
                loaded
            }
            Collection::Operations => {
                let records = settle(collection, source.operations().await)?;
                let loaded = records.is_some();
                data.operations = convert_all(collection, records.unwrap_or_default(), Operation::try_from);
                loaded
            }
        };
        data.mark(collection, loaded);
        Ok(())
    }

    /// Map a write failure, clearing the snapshot on 401
    fn settle_write<T>(&mut self, result: Result<T, FetchError>) -> CoreResult<T> {
        result.map_err(|e| {
            if e.is_unauthorized() {
                log::warn!(target: "tuitionweb::core", "Token rejected; clearing dashboard");
                self.data = DashboardData::default();
            }
            CoreError::from(e)
        })
    }

    // ==================== Queries ====================

    fn page_size(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.config.pagination.page_size).max(1)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.data.current_user.as_ref()
    }

    /// Users by full name and role, in collection order
    pub fn users_page(&self, query: &UserQuery) -> Page<User> {
        Listing::new(self.data.users.clone())
            .search(&query.q)
            .retain(|user| query.role.map_or(true, |role| user.role == role))
            .page(query.page, self.page_size(query.page_size))
    }

    /// Students with their payment status per semester
    pub fn students_page(&self, query: &StudentQuery) -> Page<StudentRow> {
        let semesters = self.semesters();
        Listing::new(self.data.students.clone())
            .search(&query.q)
            .page(query.page, self.page_size(query.page_size))
            .map(|student| reports::student_row(&student, &semesters))
    }

    /// Every student payment, newest first unless asked otherwise
    pub fn payments_page(&self, query: &PaymentQuery) -> Page<PaymentEntry> {
        let direction = query.sort.unwrap_or(self.config.listing.default_sort);
        Listing::new(payment_feed(&self.data.students))
            .search(&query.q)
            .sort(direction)
            .page(query.page, self.page_size(query.page_size))
    }

    /// Audit log filtered by type and date bucket
    pub fn operations_page(&self, query: &OperationQuery) -> Page<Operation> {
        let context = TimeContext::new(
            query.range.unwrap_or_default(),
            offset_from_hours(self.config.display.utc_offset_hours),
        );
        let direction = query.sort.unwrap_or(self.config.listing.default_sort);
        Listing::new(self.data.operations.clone())
            .search(&query.q)
            .retain(|op| query.kind.map_or(true, |kind| op.kind == kind))
            .within(&context)
            .sort(direction)
            .page(query.page, self.page_size(query.page_size))
    }

    /// Payment report over all students
    pub fn payment_report(&self) -> PaymentReport {
        reports::payment_report(&self.data.students, &self.semesters())
    }

    /// One student's semesters with paid flags and receipts
    pub fn student_semesters(&self, user_id: &str) -> CoreResult<Vec<SemesterStatus>> {
        let student = self
            .find_student(user_id)
            .ok_or_else(|| CoreError::UserNotFound { id: user_id.to_string() })?;
        Ok(reports::semester_statuses(student, &self.semesters()))
    }

    fn find_student(&self, user_id: &str) -> Option<&User> {
        self.data
            .students
            .iter()
            .chain(self.data.current_user.iter())
            .find(|u| u.id == user_id)
    }

    /// Semesters ordered by id
    pub fn semesters(&self) -> Vec<Semester> {
        sorted_semesters(&self.data.semesters)
    }

    pub fn groups(&self) -> &[Group] {
        &self.data.groups
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            current_user: self.data.current_user.as_ref().map(PayerRef::from),
            current_role: self.data.current_user.as_ref().map(|u| u.role),
            users: self.data.users.len(),
            students: self.data.students.len(),
            semesters: self.data.semesters.len(),
            groups: self.data.groups.len(),
            operations: self.data.operations.len(),
            degraded: self.data.degraded.clone(),
            currency: self.config.display.currency.clone(),
        }
    }

    // ==================== Mutations ====================

    fn require_user(&self, user_id: &str) -> CoreResult<()> {
        if self.data.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(CoreError::UserNotFound { id: user_id.to_string() })
        }
    }

    fn require_group(&self, group_id: &str) -> CoreResult<()> {
        if self.data.groups.iter().any(|g| g.id == group_id) {
            Ok(())
        } else {
            Err(CoreError::GroupNotFound { id: group_id.to_string() })
        }
    }

    fn require_semester(&self, semester_id: &str) -> CoreResult<()> {
        if self.data.semesters.iter().any(|s| s.id == semester_id) {
            Ok(())
        } else {
            Err(CoreError::SemesterNotFound { id: semester_id.to_string() })
        }
    }

    /// Pay for a semester as the current user
    pub async fn pay(&mut self, draft: &PaymentDraft) -> CoreResult<Transaction> {
        draft.validate(&self.data.semesters)?;
        let result = self.source.create_transaction(&draft.to_request()).await;
        let record = self.settle_write(result)?;
        log::info!(target: "tuitionweb::core", "Payment {} of {} for semester {}", record.id, record.amount, record.semester_id);

        self.refresh(&[
            Collection::CurrentUser,
            Collection::Users,
            Collection::Students,
            Collection::Operations,
        ])
        .await?;
        Transaction::try_from(record)
    }

    pub async fn create_user(&mut self, draft: &UserDraft) -> CoreResult<User> {
        draft.validate(self.config.validation.min_password_len)?;
        let result = self.source.create_user(&draft.to_request()).await;
        let record = self.settle_write(result)?;

        self.refresh(&[Collection::Users, Collection::Students, Collection::Operations]).await?;
        User::try_from(record)
    }

    pub async fn edit_user(&mut self, user_id: &str, draft: &UserEditDraft) -> CoreResult<User> {
        self.require_user(user_id)?;
        draft.validate()?;
        let result = self.source.edit_user(user_id, &draft.to_request()).await;
        let record = self.settle_write(result)?;

        self.refresh(&[
            Collection::CurrentUser,
            Collection::Users,
            Collection::Students,
            Collection::Groups,
            Collection::Operations,
        ])
        .await?;
        User::try_from(record)
    }

    pub async fn delete_user(&mut self, user_id: &str) -> CoreResult<()> {
        self.require_user(user_id)?;
        let result = self.source.delete_user(user_id).await;
        self.settle_write(result)?;

        self.refresh(&[
            Collection::Users,
            Collection::Students,
            Collection::Groups,
            Collection::Operations,
        ])
        .await
    }

    pub async fn create_group(&mut self, name: &str) -> CoreResult<Group> {
        validation::validate_name("name", name)?;
        let result = self.source.create_group(name.trim()).await;
        let record = self.settle_write(result)?;

        self.refresh(&[Collection::Groups, Collection::Operations]).await?;
        Group::try_from(record)
    }

    pub async fn rename_group(&mut self, group_id: &str, name: &str) -> CoreResult<Group> {
        self.require_group(group_id)?;
        validation::validate_name("name", name)?;
        let result = self.source.rename_group(group_id, name.trim()).await;
        let record = self.settle_write(result)?;

        self.refresh(&[
            Collection::Users,
            Collection::Students,
            Collection::Groups,
            Collection::Operations,
        ])
        .await?;
        Group::try_from(record)
    }

    pub async fn delete_group(&mut self, group_id: &str) -> CoreResult<()> {
        self.require_group(group_id)?;
        let result = self.source.delete_group(group_id).await;
        self.settle_write(result)?;

        self.refresh(&[
            Collection::Users,
            Collection::Students,
            Collection::Groups,
            Collection::Operations,
        ])
        .await
    }

    pub async fn create_semester(&mut self, name: &str) -> CoreResult<Semester> {
        validation::validate_name("name", name)?;
        let result = self.source.create_semester(name.trim()).await;
        let record = self.settle_write(result)?;

        self.refresh(&[Collection::Semesters, Collection::Operations]).await?;
        Ok(Semester::from(record))
    }

    pub async fn rename_semester(&mut self, semester_id: &str, name: &str) -> CoreResult<Semester> {
        self.require_semester(semester_id)?;
        validation::validate_name("name", name)?;
        let result = self.source.rename_semester(semester_id, name.trim()).await;
        let record = self.settle_write(result)?;

        self.refresh(&[Collection::Semesters, Collection::Operations]).await?;
        Ok(Semester::from(record))
    }

    pub async fn delete_semester(&mut self, semester_id: &str) -> CoreResult<()> {
        self.require_semester(semester_id)?;
        let result = self.source.delete_semester(semester_id).await;
        self.settle_write(result)?;

        self.refresh(&[Collection::Semesters, Collection::Operations]).await
    }

    pub async fn add_to_group(&mut self, group_id: &str, user_id: &str) -> CoreResult<Group> {
        self.require_group(group_id)?;
        self.require_user(user_id)?;
        let result = self.source.add_to_group(group_id, user_id).await;
        let record = self.settle_write(result)?;

        self.refresh(&[
            Collection::Users,
            Collection::Students,
            Collection::Groups,
            Collection::Operations,
        ])
        .await?;
        Group::try_from(record)
    }

    pub async fn remove_from_group(&mut self, user_id: &str) -> CoreResult<()> {
        self.require_user(user_id)?;
        let result = self.source.remove_from_group(user_id).await;
        self.settle_write(result)?;

        self.refresh(&[
            Collection::Users,
            Collection::Students,
            Collection::Groups,
            Collection::Operations,
        ])
        .await
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, SecondsFormat, Utc};
    use std::sync::{Arc, Mutex};
    use tuitionweb_client::{
        GroupRecord, InitiatorRecord, NewTransaction, NewUser, OperationRecord, SemesterRecord,
        TransactionRecord, TuitionSource, UserEdit, UserRecord,
    };

    #[derive(Default)]
    struct MockState {
        users: Vec<UserRecord>,
        semesters: Vec<SemesterRecord>,
        groups: Vec<GroupRecord>,
        operations: Vec<OperationRecord>,
        /// Collections answering with a transport error
        broken: Vec<&'static str>,
        unauthorized: bool,
        /// Status every write answers with
        failing_writes: Option<u16>,
        writes: usize,
    }

    #[derive(Default)]
    struct MockSource {
        state: Mutex<MockState>,
    }

    impl MockSource {
        fn read<T>(&self, name: &'static str, f: impl FnOnce(&MockState) -> T) -> Result<T, FetchError> {
            let state = self.state.lock().unwrap();
            if state.unauthorized {
                return Err(FetchError::Unauthorized);
            }
            if state.broken.contains(&name) {
                return Err(FetchError::Transport { message: format!("{} unreachable", name) });
            }
            Ok(f(&state))
        }

        fn write<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> Result<T, FetchError> {
            let mut state = self.state.lock().unwrap();
            if state.unauthorized {
                return Err(FetchError::Unauthorized);
            }
            if let Some(status) = state.failing_writes {
                return Err(FetchError::Status { path: "/write".to_string(), status });
            }
            state.writes += 1;
            Ok(f(&mut state))
        }
    }

    #[async_trait]
    impl TuitionSource for MockSource {
        async fn current_user(&self) -> Result<UserRecord, FetchError> {
            self.read("self", |s| s.users.first().cloned())?
                .ok_or(FetchError::NotFound { resource: "self".to_string() })
        }

        async fn users(&self) -> Result<Vec<UserRecord>, FetchError> {
            self.read("users", |s| s.users.clone())
        }

        async fn students(&self) -> Result<Vec<UserRecord>, FetchError> {
            self.read("students", |s| s.users.iter().filter(|u| u.role == "student").cloned().collect())
        }

        async fn semesters(&self) -> Result<Vec<SemesterRecord>, FetchError> {
            self.read("semesters", |s| s.semesters.clone())
        }

        async fn groups(&self) -> Result<Vec<GroupRecord>, FetchError> {
            self.read("groups", |s| s.groups.clone())
        }

        async fn operations(&self) -> Result<Vec<OperationRecord>, FetchError> {
            self.read("operations", |s| s.operations.clone())
        }

        async fn create_transaction(&self, payment: &NewTransaction) -> Result<TransactionRecord, FetchError> {
            self.write(|s| {
                let tx = TransactionRecord {
                    id: format!("t{}", s.writes),
                    user_id: s.users[0].id.clone(),
                    semester_id: payment.semester_id.clone(),
                    amount: payment.amount,
                    comment: String::new(),
                    created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                };
                s.users[0].transactions.push(tx.clone());
                tx
            })
        }

        async fn create_user(&self, user: &NewUser) -> Result<UserRecord, FetchError> {
            self.write(|s| {
                let mut record = user_record(&format!("u{}", s.users.len() + 1), &user.surname, &user.role);
                record.phone = user.phone.clone();
                s.users.push(record.clone());
                record
            })
        }

        async fn edit_user(&self, user_id: &str, edit: &UserEdit) -> Result<UserRecord, FetchError> {
            self.write(|s| {
                let user = s.users.iter_mut().find(|u| u.id == user_id).unwrap();
                user.surname = edit.surname.clone();
                user.phone = edit.phone.clone();
                user.clone()
            })
        }

        async fn delete_user(&self, user_id: &str) -> Result<(), FetchError> {
            self.write(|s| s.users.retain(|u| u.id != user_id))
        }

        async fn create_group(&self, name: &str) -> Result<GroupRecord, FetchError> {
            self.write(|s| {
                let group = GroupRecord { id: format!("g{}", s.groups.len() + 1), name: name.to_string(), users: vec![] };
                s.groups.push(group.clone());
                group
            })
        }

        async fn rename_group(&self, group_id: &str, name: &str) -> Result<GroupRecord, FetchError> {
            self.write(|s| {
                let group = s.groups.iter_mut().find(|g| g.id == group_id).unwrap();
                group.name = name.to_string();
                group.clone()
            })
        }

        async fn delete_group(&self, group_id: &str) -> Result<(), FetchError> {
            self.write(|s| s.groups.retain(|g| g.id != group_id))
        }

        async fn create_semester(&self, name: &str) -> Result<SemesterRecord, FetchError> {
            self.write(|s| {
                let semester = SemesterRecord { id: format!("s{}", s.semesters.len() + 1), name: name.to_string() };
                s.semesters.push(semester.clone());
                semester
            })
        }

        async fn rename_semester(&self, semester_id: &str, name: &str) -> Result<SemesterRecord, FetchError> {
            self.write(|s| {
                let semester = s.semesters.iter_mut().find(|x| x.id == semester_id).unwrap();
                semester.name = name.to_string();
                semester.clone()
            })
        }

        async fn delete_semester(&self, semester_id: &str) -> Result<(), FetchError> {
            self.write(|s| s.semesters.retain(|x| x.id != semester_id))
        }

        async fn add_to_group(&self, group_id: &str, user_id: &str) -> Result<GroupRecord, FetchError> {
            self.write(|s| {
                let member = s.users.iter_mut().find(|u| u.id == user_id).unwrap();
                member.group_id = Some(group_id.to_string());
                let member = member.clone();
                let group = s.groups.iter_mut().find(|g| g.id == group_id).unwrap();
                group.users.push(member);
                group.clone()
            })
        }

        async fn remove_from_group(&self, user_id: &str) -> Result<(), FetchError> {
            self.write(|s| {
                for group in s.groups.iter_mut() {
                    group.users.retain(|u| u.id != user_id);
                }
            })
        }
    }

    fn user_record(id: &str, surname: &str, role: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            name: "Ivan".to_string(),
            surname: surname.to_string(),
            patronymic: String::new(),
            group_id: None,
            group_name: None,
            role: role.to_string(),
            phone: "8 (912) 345-67-89".to_string(),
            login: id.to_string(),
            transactions: vec![],
        }
    }

    fn paid(mut user: UserRecord, semester_id: &str, amount: i64, days_ago: i64) -> UserRecord {
        user.transactions.push(TransactionRecord {
            id: format!("{}-{}", user.id, semester_id),
            user_id: user.id.clone(),
            semester_id: semester_id.to_string(),
            amount,
            comment: String::new(),
            created_at: (Utc::now() - Duration::days(days_ago)).to_rfc3339(),
        });
        user
    }

    fn operation(id: &str, kind: &str, comment: &str, days_ago: i64) -> OperationRecord {
        OperationRecord {
            id: id.to_string(),
            kind: kind.to_string(),
            user_id: "u1".to_string(),
            comment: comment.to_string(),
            created_at: (Utc::now() - Duration::days(days_ago)).to_rfc3339(),
            initiator: InitiatorRecord {
                id: "a1".to_string(),
                name: "Olga".to_string(),
                surname: "Admin".to_string(),
                patronymic: String::new(),
                role: "admin".to_string(),
            },
        }
    }

    fn seeded() -> Arc<MockSource> {
        let source = MockSource::default();
        {
            let mut s = source.state.lock().unwrap();
            s.users = vec![
                paid(user_record("u1", "Alexeev", "student"), "s1", 1000, 40),
                paid(paid(user_record("u2", "Borisov", "student"), "s1", 1000, 20), "s2", 2000, 2),
                user_record("u3", "Vasiliev", "student"),
                user_record("u4", "Grigoriev", "accountant"),
            ];
            s.semesters = vec![
                SemesterRecord { id: "s2".to_string(), name: "Spring".to_string() },
                SemesterRecord { id: "s1".to_string(), name: "Fall".to_string() },
            ];
            s.groups = vec![GroupRecord { id: "g1".to_string(), name: "IT-21".to_string(), users: vec![] }];
            s.operations = vec![
                operation("op1", "payment", "Paid Fall", 20),
                operation("op2", "group", "Created group IT-21", 10),
                operation("op3", "payment", "Paid Spring", 2),
            ];
        }
        Arc::new(source)
    }

    async fn loaded(source: Arc<MockSource>) -> Dashboard {
        let mut dashboard = Dashboard::new(Config::default(), source);
        dashboard.load().await.unwrap();
        dashboard
    }

    #[tokio::test]
    async fn test_load_fills_every_collection() {
        let dashboard = loaded(seeded()).await;
        let summary = dashboard.summary();
        assert_eq!(summary.users, 4);
        assert_eq!(summary.students, 3);
        assert_eq!(summary.semesters, 2);
        assert_eq!(summary.operations, 3);
        assert_eq!(summary.current_role, Some(Role::Student));
        assert!(summary.degraded.is_empty());
    }

    #[tokio::test]
    async fn test_failed_collection_degrades_to_empty() {
        let source = seeded();
        source.state.lock().unwrap().broken = vec!["operations"];
        let dashboard = loaded(source).await;

        assert!(dashboard.data().operations.is_empty());
        assert_eq!(dashboard.data().users.len(), 4);
        assert_eq!(dashboard.summary().degraded, vec![Collection::Operations]);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_snapshot() {
        let source = seeded();
        let mut dashboard = loaded(source.clone()).await;
        source.state.lock().unwrap().unauthorized = true;

        let err = dashboard.load().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(dashboard.data().users.is_empty());
        assert!(dashboard.current_user().is_none());
    }

    #[tokio::test]
    async fn test_users_page_filters_by_role_and_name() {
        let dashboard = loaded(seeded()).await;

        let students = dashboard.users_page(&UserQuery { role: Some(Role::Student), page: 1, ..Default::default() });
        assert_eq!(students.total_count, 3);

        let found = dashboard.users_page(&UserQuery { q: "borisov".to_string(), page: 1, ..Default::default() });
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].id, "u2");

        let paged = dashboard.users_page(&UserQuery { page: 2, page_size: Some(3), ..Default::default() });
        assert_eq!(paged.total_pages, 2);
        assert_eq!(paged.items.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_page_size_is_treated_as_one() {
        let dashboard = loaded(seeded()).await;
        let page = dashboard.users_page(&UserQuery { page: 1, page_size: Some(0), ..Default::default() });
        assert_eq!(page.page_size, 1);
        assert_eq!(page.total_pages, 4);
    }

    #[tokio::test]
    async fn test_payments_newest_first() {
        let dashboard = loaded(seeded()).await;
        let page = dashboard.payments_page(&PaymentQuery { page: 1, ..Default::default() });
        let amounts: Vec<_> = page.items.iter().map(|e| e.transaction.amount).collect();
        assert_eq!(amounts, vec![2000, 1000, 1000]);
        assert_eq!(page.items[2].student.full_name, "Alexeev Ivan");

        let asc = dashboard.payments_page(&PaymentQuery { sort: Some(SortDirection::Asc), page: 1, ..Default::default() });
        assert_eq!(asc.items[0].student.id, "u1");
    }

    #[tokio::test]
    async fn test_operations_by_type_and_range() {
        let dashboard = loaded(seeded()).await;

        let payments = dashboard.operations_page(&OperationQuery {
            kind: Some(OperationType::Payment),
            page: 1,
            ..Default::default()
        });
        let ids: Vec<_> = payments.items.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["op3", "op1"]);

        let week = dashboard.operations_page(&OperationQuery {
            range: Some(DateRange::Week),
            page: 1,
            ..Default::default()
        });
        assert_eq!(week.total_count, 1);

        let month = dashboard.operations_page(&OperationQuery {
            range: Some(DateRange::Month),
            q: "group".to_string(),
            page: 1,
            ..Default::default()
        });
        assert_eq!(month.items[0].id, "op2");
    }

    #[tokio::test]
    async fn test_report_and_student_views() {
        let dashboard = loaded(seeded()).await;

        let report = dashboard.payment_report();
        assert_eq!(report.total_users, 3);
        assert_eq!(report.grand_total, 4000);
        assert_eq!(report.semesters[0].semester_id, "s1");
        assert_eq!(report.semesters[0].paid_percentage, 67);
        assert_eq!(report.semesters[1].paid_percentage, 33);

        let rows = dashboard.students_page(&StudentQuery { page: 1, ..Default::default() });
        assert_eq!(rows.items[1].total_paid, 3000);

        let statuses = dashboard.student_semesters("u1").unwrap();
        assert!(statuses[0].paid);
        assert!(!statuses[1].paid);
        assert!(matches!(dashboard.student_semesters("nobody"), Err(CoreError::UserNotFound { .. })));
    }

    #[tokio::test]
    async fn test_pay_validates_then_refreshes() {
        let source = seeded();
        let mut dashboard = loaded(source.clone()).await;

        let err = dashboard
            .pay(&PaymentDraft { semester_id: "s9".to_string(), amount: 100 })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert_eq!(source.state.lock().unwrap().writes, 0);

        let tx = dashboard
            .pay(&PaymentDraft { semester_id: "s2".to_string(), amount: 2000 })
            .await
            .unwrap();
        assert_eq!(tx.amount, 2000);
        assert_eq!(dashboard.current_user().unwrap().total_paid(), 3000);
        assert_eq!(dashboard.payment_report().grand_total, 6000);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_snapshot_unless_unauthorized() {
        let source = seeded();
        let mut dashboard = loaded(source.clone()).await;

        source.state.lock().unwrap().unauthorized = true;
        let err = dashboard.create_group("IT-22").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(dashboard.data().groups.is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_snapshot_untouched() {
        let source = seeded();
        source.state.lock().unwrap().broken = vec!["operations"];
        let mut dashboard = loaded(source.clone()).await;
        source.state.lock().unwrap().failing_writes = Some(503);

        let groups = dashboard.data().groups.clone();
        let users = dashboard.data().users.clone();
        let summary = dashboard.summary();

        let err = dashboard.create_group("IT-22").await.unwrap_err();
        assert!(matches!(err, CoreError::Source { .. }));

        let err = dashboard
            .pay(&PaymentDraft { semester_id: "s2".to_string(), amount: 2000 })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Source { .. }));

        assert_eq!(dashboard.data().groups, groups);
        assert_eq!(dashboard.data().users, users);
        assert_eq!(dashboard.summary(), summary);
        assert_eq!(dashboard.data().degraded, vec![Collection::Operations]);
        assert_eq!(source.state.lock().unwrap().writes, 0);
    }

    #[tokio::test]
    async fn test_user_crud() {
        let source = seeded();
        let mut dashboard = loaded(source).await;

        let draft = UserDraft {
            name: "Petr".to_string(),
            surname: "Dmitriev".to_string(),
            patronymic: String::new(),
            role: Role::Student,
            phone: "+7 912 000 11 22".to_string(),
            login: "pdmitriev".to_string(),
            password: "short".to_string(),
        };
        assert!(dashboard.create_user(&draft).await.is_err());

        let created = dashboard
            .create_user(&UserDraft { password: "long enough".to_string(), ..draft })
            .await
            .unwrap();
        assert_eq!(created.phone, "8 (912) 000-11-22");
        assert_eq!(dashboard.data().students.len(), 4);

        let edit = UserEditDraft {
            name: "Petr".to_string(),
            surname: "Dmitrievsky".to_string(),
            patronymic: String::new(),
            phone: "89120001122".to_string(),
        };
        dashboard.edit_user(&created.id, &edit).await.unwrap();
        assert!(dashboard.data().users.iter().any(|u| u.surname == "Dmitrievsky"));

        dashboard.delete_user(&created.id).await.unwrap();
        assert_eq!(dashboard.data().users.len(), 4);
        assert!(matches!(dashboard.delete_user(&created.id).await, Err(CoreError::UserNotFound { .. })));
    }

    #[tokio::test]
    async fn test_group_and_semester_management() {
        let mut dashboard = loaded(seeded()).await;

        let group = dashboard.create_group("  IT-22 ").await.unwrap();
        assert_eq!(group.name, "IT-22");
        dashboard.rename_group(&group.id, "IT-23").await.unwrap();
        let group = dashboard.add_to_group(&group.id, "u3").await.unwrap();
        assert_eq!(group.users.len(), 1);
        dashboard.remove_from_group("u3").await.unwrap();
        dashboard.delete_group(&group.id).await.unwrap();
        assert_eq!(dashboard.groups().len(), 1);
        assert!(matches!(dashboard.create_group(" ").await, Err(CoreError::Validation { .. })));

        let semester = dashboard.create_semester("Summer").await.unwrap();
        dashboard.rename_semester(&semester.id, "Summer school").await.unwrap();
        assert!(dashboard.semesters().iter().any(|s| s.name == "Summer school"));
        dashboard.delete_semester(&semester.id).await.unwrap();
        assert_eq!(dashboard.semesters().len(), 2);
        assert!(matches!(
            dashboard.rename_semester("s9", "x").await,
            Err(CoreError::SemesterNotFound { .. })
        ));
    }
}
