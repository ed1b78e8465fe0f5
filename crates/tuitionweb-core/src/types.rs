//! Basic enumerations shared by the dashboard models

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Pays tuition
    Student,
    /// Views aggregate reports
    Observer,
    /// Reconciles payments
    Accountant,
    /// Manages users, groups and semesters
    Admin,
}

impl Role {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Observer => "Observer",
            Role::Accountant => "Accountant",
            Role::Admin => "Administrator",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "observer" => Ok(Role::Observer),
            "accountant" => Ok(Role::Accountant),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Observer => write!(f, "observer"),
            Role::Accountant => write!(f, "accountant"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// What an audit log entry is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    User,
    Group,
    Semester,
    Payment,
}

impl OperationType {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            OperationType::User => "User",
            OperationType::Group => "Group",
            OperationType::Semester => "Semester",
            OperationType::Payment => "Payment",
        }
    }
}

impl std::str::FromStr for OperationType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(OperationType::User),
            "group" => Ok(OperationType::Group),
            "semester" => Ok(OperationType::Semester),
            "payment" => Ok(OperationType::Payment),
            _ => Err(format!("Invalid operation type: {}", s)),
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationType::User => write!(f, "user"),
            OperationType::Group => write!(f, "group"),
            OperationType::Semester => write!(f, "semester"),
            OperationType::Payment => write!(f, "payment"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!("student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!("Observer".parse::<Role>().unwrap(), Role::Observer);
        assert_eq!("accountant".parse::<Role>().unwrap(), Role::Accountant);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("dean".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_round_trips_through_display() {
        for role in [Role::Student, Role::Observer, Role::Accountant, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert_eq!(Role::Admin.display_name(), "Administrator");
    }

    #[test]
    fn test_operation_type_from_str() {
        assert_eq!("payment".parse::<OperationType>().unwrap(), OperationType::Payment);
        assert_eq!("group".parse::<OperationType>().unwrap(), OperationType::Group);
        assert!("refund".parse::<OperationType>().is_err());
        assert_eq!(OperationType::Semester.display_name(), "Semester");
    }
}
