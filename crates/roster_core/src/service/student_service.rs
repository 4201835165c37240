//! Student use-case service.
//!
//! # Responsibility
//! - Run form validation before any store access.
//! - Translate repository outcomes into use-case errors.
//!
//! # Invariants
//! - A form that fails validation never reaches the repository.
//! - Edit and delete report `NotFound` for unknown ids before validating.

use crate::model::student::{Student, StudentForm, StudentId, StudentValidationError};
use crate::repo::student_repo::{RepoError, StudentRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, StudentServiceError>;

/// Service error for student use-cases.
#[derive(Debug)]
pub enum StudentServiceError {
    /// Submitted fields failed validation.
    Invalid(StudentValidationError),
    /// Another student already uses this email.
    EmailTaken(String),
    /// Target student does not exist.
    NotFound(StudentId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for StudentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "invalid student input: {err}"),
            Self::EmailTaken(email) => write!(f, "email already in use: {email}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StudentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StudentValidationError> for StudentServiceError {
    fn from(value: StudentValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<RepoError> for StudentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::DuplicateEmail(email) => Self::EmailTaken(email),
            RepoError::Validation(err) => Self::Invalid(err),
            other => Self::Repo(other),
        }
    }
}

/// Use-case service wrapper for student CRUD operations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all students in insertion order.
    pub fn list_students(&self) -> ServiceResult<Vec<Student>> {
        Ok(self.repo.list_students()?)
    }

    /// Loads one student or fails with `NotFound`.
    pub fn get_student(&self, id: StudentId) -> ServiceResult<Student> {
        self.repo
            .get_student(id)?
            .ok_or(StudentServiceError::NotFound(id))
    }

    /// Validates a submitted form and creates the student.
    ///
    /// # Errors
    /// - `Invalid` with the first failing check; nothing is written.
    /// - `EmailTaken` when the store rejects a duplicate email.
    pub fn add_student(&self, form: &StudentForm) -> ServiceResult<Student> {
        let draft = form.validate()?;
        Ok(self.repo.create_student(&draft)?)
    }

    /// Validates a submitted form and replaces the student's fields.
    ///
    /// # Errors
    /// - `NotFound` when `id` is unknown, regardless of form contents.
    /// - `Invalid` with the first failing check; nothing is written.
    /// - `EmailTaken` when another student holds the email; both rows stay
    ///   unchanged.
    pub fn edit_student(&self, id: StudentId, form: &StudentForm) -> ServiceResult<Student> {
        self.get_student(id)?;
        let draft = form.validate()?;
        Ok(self.repo.update_student(id, &draft)?)
    }

    /// Removes a student permanently.
    pub fn delete_student(&self, id: StudentId) -> ServiceResult<()> {
        Ok(self.repo.delete_student(id)?)
    }
}
