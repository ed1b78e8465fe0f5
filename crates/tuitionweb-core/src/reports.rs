//! Payment report structures and aggregation
//!
//! All functions here are pure: they read the users and semesters they are
//! given and build a fresh report every call.

use serde::{Deserialize, Serialize};

use crate::models::{Semester, Transaction, User};

/// Per-semester payment figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterSummary {
    pub semester_id: String,
    pub semester_name: String,
    /// Users with at least one payment for the semester
    pub paid_count: usize,
    pub unpaid_count: usize,
    /// Rounded to the nearest whole percent
    pub paid_percentage: u32,
    pub total_amount: i64,
}

/// Payment report over a population of users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReport {
    pub semesters: Vec<SemesterSummary>,
    pub total_users: usize,
    /// Users with at least one payment of any semester
    pub paid_users: usize,
    pub grand_total: i64,
}

/// One semester as seen by a single student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterStatus {
    pub semester: Semester,
    pub paid: bool,
    /// Payment to show a receipt for
    pub transaction: Option<Transaction>,
}

/// Paid flag of one semester in a student row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterFlag {
    pub semester_id: String,
    pub paid: bool,
}

/// Student line of the accountant and observer tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRow {
    pub id: String,
    pub full_name: String,
    pub group_name: Option<String>,
    pub phone: String,
    pub total_paid: i64,
    pub semesters: Vec<SemesterFlag>,
}

/// paid / total as a whole percentage, half rounded up; 0 when total is 0
pub fn paid_percentage(paid: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((paid * 200 + total) / (total * 2)) as u32
}

/// Aggregate payments per semester and across the whole population
pub fn payment_report(users: &[User], semesters: &[Semester]) -> PaymentReport {
    let total_users = users.len();

    let summaries = semesters
        .iter()
        .map(|semester| {
            let paid_count = users.iter().filter(|u| u.has_paid(&semester.id)).count();
            let total_amount = users
                .iter()
                .flat_map(|u| u.transactions.iter())
                .filter(|t| t.semester_id == semester.id)
                .map(|t| t.amount)
                .sum();

            SemesterSummary {
                semester_id: semester.id.clone(),
                semester_name: semester.name.clone(),
                paid_count,
                unpaid_count: total_users - paid_count,
                paid_percentage: paid_percentage(paid_count, total_users),
                total_amount,
            }
        })
        .collect();

    PaymentReport {
        semesters: summaries,
        total_users,
        paid_users: users.iter().filter(|u| u.has_any_payment()).count(),
        grand_total: users.iter().map(User::total_paid).sum(),
    }
}

/// Each semester with the user's payment state, in the given order
pub fn semester_statuses(user: &User, semesters: &[Semester]) -> Vec<SemesterStatus> {
    semesters
        .iter()
        .map(|semester| {
            let transaction = user.payment_for(&semester.id).cloned();
            SemesterStatus {
                semester: semester.clone(),
                paid: transaction.is_some(),
                transaction,
            }
        })
        .collect()
}

pub fn student_row(user: &User, semesters: &[Semester]) -> StudentRow {
    StudentRow {
        id: user.id.clone(),
        full_name: user.full_name(),
        group_name: user.group_name.clone(),
        phone: user.phone.clone(),
        total_paid: user.total_paid(),
        semesters: semesters
            .iter()
            .map(|s| SemesterFlag {
                semester_id: s.id.clone(),
                paid: user.has_paid(&s.id),
            })
            .collect(),
    }
}
