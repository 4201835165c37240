//! Core domain logic for the student roster.
//! This crate is the single source of truth for student invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::email::is_valid_email;
pub use model::student::{
    validate_student_fields, Student, StudentDraft, StudentForm, StudentId,
    StudentValidationError,
};
pub use repo::student_repo::{RepoError, RepoResult, SqliteStudentRepository, StudentRepository};
pub use service::student_service::{ServiceResult, StudentService, StudentServiceError};

/// Minimal health-check API used by `/health`.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
