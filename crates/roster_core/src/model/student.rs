//! Student domain model and input validation.
//!
//! # Responsibility
//! - Define the persisted `Student` record and its pre-persistence shapes.
//! - Validate raw form input in a fixed, short-circuiting order.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes.
//! - `name` and `email` are stored trimmed and non-empty.
//! - `age` is always `>= 1`.

use crate::model::email::is_valid_email;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a student row.
pub type StudentId = i64;

/// Persisted student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub age: u32,
    /// Unique across all students.
    pub email: String,
}

impl Display for Student {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Validated student fields that have not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: String,
    pub age: u32,
    pub email: String,
}

impl StudentDraft {
    /// Re-checks the typed fields with the same rules as form input.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        validate_student_fields(&self.name, &self.age.to_string(), &self.email).map(|_| ())
    }

    /// Attaches a store-assigned id.
    pub fn into_student(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            age: self.age,
            email: self.email,
        }
    }
}

/// Raw student fields as submitted by a form.
///
/// Missing fields deserialize to empty strings so they fail validation with
/// `MissingFields` instead of a decoding error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub name: String,
    pub age: String,
    pub email: String,
}

impl StudentForm {
    pub fn new(
        name: impl Into<String>,
        age: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            email: email.into(),
        }
    }

    /// Returns a copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self::new(self.name.trim(), self.age.trim(), self.email.trim())
    }

    /// Builds a form from decoded `key=value` pairs.
    ///
    /// A repeated field keeps its last value; unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "name" => form.name = value.into(),
                "age" => form.age = value.into(),
                "email" => form.email = value.into(),
                _ => {}
            }
        }
        form
    }

    /// Validates the raw fields and returns trimmed, typed values.
    pub fn validate(&self) -> Result<StudentDraft, StudentValidationError> {
        let age = validate_student_fields(&self.name, &self.age, &self.email)?;
        Ok(StudentDraft {
            name: self.name.trim().to_string(),
            age,
            email: self.email.trim().to_string(),
        })
    }
}

impl From<&Student> for StudentForm {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            age: student.age.to_string(),
            email: student.email.clone(),
        }
    }
}

impl From<&StudentDraft> for StudentForm {
    fn from(draft: &StudentDraft) -> Self {
        Self {
            name: draft.name.clone(),
            age: draft.age.to_string(),
            email: draft.email.clone(),
        }
    }
}

/// First failing check reported by [`validate_student_fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentValidationError {
    /// At least one field is empty after trimming.
    MissingFields,
    /// Age is not a positive decimal integer.
    InvalidAge,
    /// Email fails syntax validation.
    InvalidEmail,
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "name, age and email are required"),
            Self::InvalidAge => write!(f, "age must be a positive integer"),
            Self::InvalidEmail => write!(f, "email address is not valid"),
        }
    }
}

impl Error for StudentValidationError {}

/// Validates raw student input and returns the parsed age.
///
/// Checks run in this order and stop at the first failure:
/// 1. every field is non-empty after trimming,
/// 2. age is all ASCII digits and parses to a value `>= 1`,
/// 3. email is syntactically valid.
pub fn validate_student_fields(
    name: &str,
    age_text: &str,
    email: &str,
) -> Result<u32, StudentValidationError> {
    let name = name.trim();
    let age_text = age_text.trim();
    let email = email.trim();

    if name.is_empty() || age_text.is_empty() || email.is_empty() {
        return Err(StudentValidationError::MissingFields);
    }

    let age = parse_positive_age(age_text).ok_or(StudentValidationError::InvalidAge)?;

    if !is_valid_email(email) {
        return Err(StudentValidationError::InvalidEmail);
    }

    Ok(age)
}

fn parse_positive_age(text: &str) -> Option<u32> {
    // `u32::from_str` accepts a leading `+`; digits only here.
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u32>().ok().filter(|age| *age > 0)
}

#[cfg(test)]
mod tests {
    use super::{parse_positive_age, validate_student_fields, StudentForm, StudentValidationError};

    #[test]
    fn parse_positive_age_rejects_signs_and_zero() {
        assert_eq!(parse_positive_age("20"), Some(20));
        assert_eq!(parse_positive_age("007"), Some(7));
        assert_eq!(parse_positive_age("0"), None);
        assert_eq!(parse_positive_age("+5"), None);
        assert_eq!(parse_positive_age("-5"), None);
        assert_eq!(parse_positive_age("4.5"), None);
        assert_eq!(parse_positive_age("99999999999"), None);
        assert_eq!(parse_positive_age("٢٥"), None);
    }

    #[test]
    fn from_pairs_keeps_last_repeated_value() {
        let form = StudentForm::from_pairs([
            ("name", "First"),
            ("name", "Second"),
            ("age", "30"),
            ("csrf", "ignored"),
        ]);

        assert_eq!(form, StudentForm::new("Second", "30", ""));
    }

    #[test]
    fn missing_fields_wins_over_later_checks() {
        let err = validate_student_fields("  ", "-1", "bad").unwrap_err();
        assert_eq!(err, StudentValidationError::MissingFields);
    }

    #[test]
    fn invalid_age_wins_over_invalid_email() {
        let err = validate_student_fields("Bob", "abc", "bad").unwrap_err();
        assert_eq!(err, StudentValidationError::InvalidAge);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let age = validate_student_fields(" Alice ", " 22 ", " alice@example.com ").unwrap();
        assert_eq!(age, 22);
    }

    #[test]
    fn internationalized_email_domain_is_accepted() {
        assert_eq!(validate_student_fields("Ana", "20", "ana@bücher.example"), Ok(20));
    }
}
