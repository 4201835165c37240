//! Server-rendered HTTP surface for the student roster.
//!
//! # Responsibility
//! - Map routes to student use-cases in `roster_core`.
//! - Render HTML pages and carry one-shot notices across redirects.
//!
//! # Invariants
//! - Handlers never issue SQL directly; all store access goes through
//!   `StudentService`.
//! - Unknown or malformed student ids always produce a 404 page.

pub mod error;
pub mod handlers;
pub mod notice;
pub mod router;
pub mod state;
pub mod views;

pub use error::WebError;
pub use notice::{FlashNotice, Notice, NoticeKind, FLASH_COOKIE};
pub use router::create_router;
pub use state::AppState;
