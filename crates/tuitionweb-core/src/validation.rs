//! Draft validation for the admin and student forms
//!
//! Every check runs before a draft reaches the payments API. Failures are
//! collected per field so a form can show all of them at once.

use serde::{Deserialize, Serialize};
use tuitionweb_client::{NewTransaction, NewUser, UserEdit};

use crate::error::{CoreError, CoreResult};
use crate::models::Semester;
use crate::types::Role;

/// One failing form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulates field errors for one draft
#[derive(Debug, Default)]
struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    fn require(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.errors.push(FieldError::new(field, format!("{} is required", label)));
        }
    }

    /// Checked in the normalised form the request will carry
    fn phone(&mut self, value: &str) {
        if !is_valid_phone(&format_phone(value)) {
            self.errors.push(FieldError::new("phone", "Enter a valid phone number"));
        }
    }

    fn finish(self) -> CoreResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation { errors: self.errors })
        }
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalise phone input to `8 (XXX) XXX-XX-XX`
///
/// A leading 7 or 8 becomes 8, anything else gets 8 prepended. Input is
/// cut at 11 digits; shorter input is punctuated as far as it goes.
pub fn format_phone(value: &str) -> String {
    let raw = digits(value);
    if raw.is_empty() {
        return String::new();
    }
    let rest = match raw.as_bytes()[0] {
        b'7' | b'8' => &raw[1..],
        _ => raw.as_str(),
    };
    let rest: Vec<char> = rest.chars().take(10).collect();

    let mut out = String::from("8");
    let groups: [(usize, usize, &str); 4] = [(0, 3, " ("), (3, 6, ") "), (6, 8, "-"), (8, 10, "-")];
    for (start, end, prefix) in groups {
        if rest.len() <= start {
            break;
        }
        out.push_str(prefix);
        out.extend(&rest[start..end.min(rest.len())]);
    }
    out
}

/// Exactly 11 digits starting with 8, punctuation ignored
pub fn is_valid_phone(value: &str) -> bool {
    let raw = digits(value);
    raw.len() == 11 && raw.starts_with('8')
}

/// Long enough, counted in characters
pub fn is_valid_password(password: &str, min_len: usize) -> bool {
    password.chars().count() >= min_len
}

/// New user form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: String,
    pub role: Role,
    pub phone: String,
    pub login: String,
    pub password: String,
}

impl UserDraft {
    pub fn validate(&self, min_password_len: usize) -> CoreResult<()> {
        let mut checks = Checks::default();
        checks.require("surname", &self.surname, "Surname");
        checks.require("name", &self.name, "Name");
        checks.require("login", &self.login, "Login");
        checks.phone(&self.phone);
        if !is_valid_password(&self.password, min_password_len) {
            checks.errors.push(FieldError::new(
                "password",
                format!("Password must be at least {} characters", min_password_len),
            ));
        }
        checks.finish()
    }

    /// Request body with the phone normalised
    pub fn to_request(&self) -> NewUser {
        NewUser {
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            patronymic: self.patronymic.trim().to_string(),
            role: self.role.to_string(),
            phone: format_phone(&self.phone),
            login: self.login.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Edit user form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEditDraft {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: String,
    pub phone: String,
}

impl UserEditDraft {
    pub fn validate(&self) -> CoreResult<()> {
        let mut checks = Checks::default();
        checks.require("surname", &self.surname, "Surname");
        checks.require("name", &self.name, "Name");
        checks.phone(&self.phone);
        checks.finish()
    }

    pub fn to_request(&self) -> UserEdit {
        UserEdit {
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            patronymic: self.patronymic.trim().to_string(),
            phone: format_phone(&self.phone),
        }
    }
}

/// Group and semester names
pub fn validate_name(field: &str, name: &str) -> CoreResult<()> {
    let mut checks = Checks::default();
    checks.require(field, name, "Name");
    checks.finish()
}

/// Payment form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDraft {
    pub semester_id: String,
    pub amount: i64,
}

impl PaymentDraft {
    /// The semester must be one of the loaded ones
    pub fn validate(&self, semesters: &[Semester]) -> CoreResult<()> {
        let mut checks = Checks::default();
        if !semesters.iter().any(|s| s.id == self.semester_id) {
            checks.errors.push(FieldError::new("semester_id", "Choose a semester"));
        }
        if self.amount <= 0 {
            checks.errors.push(FieldError::new("amount", "Amount must be positive"));
        }
        checks.finish()
    }

    pub fn to_request(&self) -> NewTransaction {
        NewTransaction {
            semester_id: self.semester_id.clone(),
            amount: self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(result: CoreResult<()>) -> Vec<String> {
        match result {
            Err(CoreError::Validation { errors }) => errors.into_iter().map(|e| e.field).collect(),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(()) => vec![],
        }
    }

    fn draft() -> UserDraft {
        UserDraft {
            name: "Ivan".to_string(),
            surname: "Petrov".to_string(),
            patronymic: String::new(),
            role: Role::Student,
            phone: "+7 (912) 345-67-89".to_string(),
            login: "ipetrov".to_string(),
            password: "secret12".to_string(),
        }
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("+7 (912) 345-67-89"), "8 (912) 345-67-89");
        assert_eq!(format_phone("89123456789"), "8 (912) 345-67-89");
        assert_eq!(format_phone("9123456789"), "8 (912) 345-67-89");
        assert_eq!(format_phone("8912345678999"), "8 (912) 345-67-89");
        assert_eq!(format_phone("8912"), "8 (912");
        assert_eq!(format_phone("89123"), "8 (912) 3");
        assert_eq!(format_phone("8"), "8");
        assert_eq!(format_phone("abc"), "");
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("8 (912) 345-67-89"));
        assert!(is_valid_phone(&format_phone("+7 (912) 345-67-89")));
        assert!(!is_valid_phone("912345"));
    }

    #[test]
    fn test_password_length_counts_characters() {
        assert!(!is_valid_password("1234567", 8));
        assert!(is_valid_password("12345678", 8));
        assert!(is_valid_password("пароль12", 8));
    }

    #[test]
    fn test_user_draft_reports_every_field() {
        assert!(draft().validate(8).is_ok());

        let bad = UserDraft {
            name: " ".to_string(),
            login: String::new(),
            phone: "912345".to_string(),
            password: "short".to_string(),
            ..draft()
        };
        assert_eq!(fields(bad.validate(8)), vec!["name", "login", "phone", "password"]);
    }

    #[test]
    fn test_user_draft_request_normalises_phone() {
        let request = draft().to_request();
        assert_eq!(request.phone, "8 (912) 345-67-89");
        assert_eq!(request.role, "student");
    }

    #[test]
    fn test_user_edit_draft() {
        let edit = UserEditDraft {
            name: "Ivan".to_string(),
            surname: String::new(),
            patronymic: String::new(),
            phone: "8 912 345 67 89".to_string(),
        };
        assert_eq!(fields(edit.validate()), vec!["surname"]);
    }

    #[test]
    fn test_drafts_accept_plus_seven_phone() {
        let user = UserDraft {
            phone: "+7 912 000 11 22".to_string(),
            ..draft()
        };
        assert!(user.validate(8).is_ok());
        assert_eq!(user.to_request().phone, "8 (912) 000-11-22");

        let edit = UserEditDraft {
            name: "Ivan".to_string(),
            surname: "Petrov".to_string(),
            patronymic: String::new(),
            phone: "+7 (912) 345-67-89".to_string(),
        };
        assert!(edit.validate().is_ok());

        let short = UserEditDraft {
            phone: "+7 912 345".to_string(),
            ..edit
        };
        assert_eq!(fields(short.validate()), vec!["phone"]);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "IT-21").is_ok());
        assert_eq!(fields(validate_name("name", "  ")), vec!["name"]);
    }

    #[test]
    fn test_payment_draft() {
        let semesters = vec![Semester { id: "s1".to_string(), name: "Fall".to_string() }];
        let ok = PaymentDraft { semester_id: "s1".to_string(), amount: 1000 };
        assert!(ok.validate(&semesters).is_ok());

        let bad = PaymentDraft { semester_id: "s2".to_string(), amount: 0 };
        assert_eq!(fields(bad.validate(&semesters)), vec!["semester_id", "amount"]);
    }
}
