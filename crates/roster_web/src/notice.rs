//! User-facing notifications.
//!
//! # Responsibility
//! - Hold the exact texts shown to users after each outcome.
//! - Encode success notices as short cookie codes that survive a redirect.
//!
//! # Invariants
//! - Cookie values are fixed ASCII codes; free text never goes into a cookie.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use roster_core::StudentValidationError;

/// Cookie carrying a pending [`FlashNotice`] to the next page view.
pub const FLASH_COOKIE: &str = "roster_flash";

pub const MISSING_FIELDS_TEXT: &str = "All fields are required.";
pub const INVALID_AGE_TEXT: &str = "Age must be a positive number.";
pub const INVALID_EMAIL_TEXT: &str = "Please enter a valid email address.";
pub const EMAIL_TAKEN_TEXT: &str = "Email already exists. Please use a different one.";
pub const ADDED_TEXT: &str = "Student added successfully!";
pub const UPDATED_TEXT: &str = "Student updated successfully!";
pub const DELETED_TEXT: &str = "Student deleted successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    /// CSS class used when rendering.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One message shown on a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: &'static str,
}

impl Notice {
    pub fn error(text: &'static str) -> Self {
        Self {
            kind: NoticeKind::Error,
            text,
        }
    }

    pub fn success(text: &'static str) -> Self {
        Self {
            kind: NoticeKind::Success,
            text,
        }
    }

    pub fn email_taken() -> Self {
        Self::error(EMAIL_TAKEN_TEXT)
    }
}

impl From<StudentValidationError> for Notice {
    fn from(value: StudentValidationError) -> Self {
        Self::error(match value {
            StudentValidationError::MissingFields => MISSING_FIELDS_TEXT,
            StudentValidationError::InvalidAge => INVALID_AGE_TEXT,
            StudentValidationError::InvalidEmail => INVALID_EMAIL_TEXT,
        })
    }
}

/// Success notices that are shown after a redirect to the list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashNotice {
    Added,
    Updated,
    Deleted,
}

impl FlashNotice {
    pub fn code(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "added" => Some(Self::Added),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }

    pub fn notice(self) -> Notice {
        Notice::success(match self {
            Self::Added => ADDED_TEXT,
            Self::Updated => UPDATED_TEXT,
            Self::Deleted => DELETED_TEXT,
        })
    }

    /// `Set-Cookie` value that stores this notice until the next page view.
    pub fn set_cookie(self) -> String {
        format!(
            "{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
            self.code()
        )
    }

    /// `Set-Cookie` value that drops any pending notice.
    pub fn clear_cookie() -> String {
        format!("{FLASH_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
    }

    /// Reads the pending notice from request cookies, ignoring unknown codes.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == FLASH_COOKIE)
            .and_then(|(_, code)| Self::from_code(code.trim()))
    }
}

/// Short reason code for logs.
pub fn rejection_code(kind: StudentValidationError) -> &'static str {
    match kind {
        StudentValidationError::MissingFields => "missing_fields",
        StudentValidationError::InvalidAge => "invalid_age",
        StudentValidationError::InvalidEmail => "invalid_email",
    }
}
