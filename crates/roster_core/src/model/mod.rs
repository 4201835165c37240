//! Student domain model.
//!
//! # Responsibility
//! - Define the single persisted entity (`Student`) and its form shapes.
//! - Keep validation rules pure and storage-agnostic.

pub mod email;
pub mod student;
