//! Shared application state.
//!
//! # Invariants
//! - The connection is the only shared mutable resource.
//! - The lock is held for one handler's store work and never across `.await`.
//! - Handlers reach the store through [`AppState::run`], off the async workers.

use crate::error::WebError;
use log::error;
use roster_core::{SqliteStudentRepository, StudentService};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Injected store handle passed to every handler.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` against a student service bound to the locked connection.
    ///
    /// # Errors
    /// - `WebError::Internal` when a previous holder panicked with the lock.
    pub fn with_service<T>(
        &self,
        f: impl FnOnce(&StudentService<SqliteStudentRepository<'_>>) -> T,
    ) -> Result<T, WebError> {
        let conn = self.db.lock().map_err(|_| {
            error!("event=db_lock module=web status=error error_code=lock_poisoned");
            WebError::Internal("database lock poisoned".to_string())
        })?;
        let service = StudentService::new(SqliteStudentRepository::new(&conn));
        Ok(f(&service))
    }

    /// Runs `f` like [`AppState::with_service`] on tokio's blocking pool.
    ///
    /// # Errors
    /// - `WebError::Internal` when the lock is poisoned or the task panicked.
    pub async fn run<T, F>(&self, f: F) -> Result<T, WebError>
    where
        T: Send + 'static,
        F: FnOnce(&StudentService<SqliteStudentRepository<'_>>) -> T + Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || state.with_service(f))
            .await
            .map_err(|err| {
                error!("event=db_task module=web status=error error={err}");
                WebError::Internal(format!("store task failed: {err}"))
            })?
    }
}
