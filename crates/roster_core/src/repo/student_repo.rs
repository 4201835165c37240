//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `students` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `StudentDraft::validate()` before SQL mutations.
//! - Email uniqueness is enforced by the `UNIQUE` column constraint, so a
//!   concurrent duplicate insert still fails as `DuplicateEmail`.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Every mutation is committed before the call returns.

use crate::db::DbError;
use crate::model::student::{Student, StudentDraft, StudentId, StudentValidationError};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    age,
    email
FROM students";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StudentValidationError),
    Db(DbError),
    NotFound(StudentId),
    /// Another row already holds this email.
    DuplicateEmail(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::DuplicateEmail(email) => write!(f, "email already in use: {email}"),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateEmail(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for student CRUD operations.
pub trait StudentRepository {
    /// Lists every student in insertion order.
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Inserts a new row and returns it with the assigned id.
    fn create_student(&self, draft: &StudentDraft) -> RepoResult<Student>;
    /// Replaces name, age and email of an existing row.
    fn update_student(&self, id: StudentId, draft: &StudentDraft) -> RepoResult<Student>;
    fn delete_student(&self, id: StudentId) -> RepoResult<()>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn list_students(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();

        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let row = self
            .conn
            .query_row(
                &format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                |row| Ok(parse_student_row(row)),
            )
            .optional()?;

        row.transpose()
    }

    fn create_student(&self, draft: &StudentDraft) -> RepoResult<Student> {
        draft.validate()?;

        self.conn
            .execute(
                "INSERT INTO students (name, age, email) VALUES (?1, ?2, ?3);",
                params![draft.name.as_str(), draft.age, draft.email.as_str()],
            )
            .map_err(|err| map_write_error(err, &draft.email))?;

        Ok(draft.clone().into_student(self.conn.last_insert_rowid()))
    }

    fn update_student(&self, id: StudentId, draft: &StudentDraft) -> RepoResult<Student> {
        draft.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE students
                 SET
                    name = ?1,
                    age = ?2,
                    email = ?3,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?4;",
                params![draft.name.as_str(), draft.age, draft.email.as_str(), id],
            )
            .map_err(|err| map_write_error(err, &draft.email))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(draft.clone().into_student(id))
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn map_write_error(err: rusqlite::Error, email: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::DuplicateEmail(email.to_string())
        }
        _ => err.into(),
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let id: StudentId = row.get("id")?;
    let raw_age: i64 = row.get("age")?;
    let age = u32::try_from(raw_age)
        .ok()
        .filter(|age| *age > 0)
        .ok_or_else(|| {
            RepoError::InvalidData(format!("invalid age `{raw_age}` in students.age (id={id})"))
        })?;

    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty name in students.name (id={id})"
        )));
    }

    Ok(Student {
        id,
        name,
        age,
        email: row.get("email")?,
    })
}
