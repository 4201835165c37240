//! Route handlers for the student pages.
//!
//! Each handler validates through `StudentService`, then either re-renders
//! the form with an error notice (200) or redirects to the list (302) with a
//! flash notice.
//!
//! Form bodies are decoded as raw pairs so a repeated field keeps its last
//! value instead of failing the request.

use crate::error::WebError;
use crate::notice::{rejection_code, FlashNotice, Notice};
use crate::state::AppState;
use crate::views::{self, FormMode};
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use log::{info, warn};
use roster_core::{StudentForm, StudentId, StudentServiceError};

const STUDENT_LIST_PATH: &str = "/students";

type FormPairs = Vec<(String, String)>;

pub async fn index() -> Redirect {
    Redirect::to(STUDENT_LIST_PATH)
}

pub async fn health() -> String {
    format!("{} version={}", roster_core::ping(), roster_core::core_version())
}

/// `GET /students`: every student in insertion order, plus any pending flash.
pub async fn list_students(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let students = state.run(|service| service.list_students()).await??;
    let flash = FlashNotice::from_headers(&headers).map(FlashNotice::notice);
    let page = views::student_list_page(&students, flash.as_ref());

    if flash.is_some() {
        return Ok(([(SET_COOKIE, FlashNotice::clear_cookie())], page).into_response());
    }
    Ok(page.into_response())
}

/// `GET /students/add`: empty form.
pub async fn show_add_form() -> Response {
    views::student_form_page(FormMode::Add, &StudentForm::default(), None).into_response()
}

/// `POST /students/add`.
///
/// Entered values are discarded when the form is re-rendered.
pub async fn submit_add(
    State(state): State<AppState>,
    Form(pairs): Form<FormPairs>,
) -> Result<Response, WebError> {
    let form = StudentForm::from_pairs(pairs);
    let result = state.run(move |service| service.add_student(&form)).await?;

    let notice = match result {
        Ok(student) => {
            info!(
                "event=student_add module=web status=ok student_id={}",
                student.id
            );
            return Ok(redirect_to_list(FlashNotice::Added));
        }
        Err(StudentServiceError::Invalid(kind)) => {
            info!(
                "event=student_add module=web status=rejected reason={}",
                rejection_code(kind)
            );
            Notice::from(kind)
        }
        Err(StudentServiceError::EmailTaken(_)) => {
            info!("event=student_add module=web status=rejected reason=email_taken");
            Notice::email_taken()
        }
        Err(other) => return Err(other.into()),
    };

    let page = views::student_form_page(FormMode::Add, &StudentForm::default(), Some(&notice));
    Ok(page.into_response())
}

/// `GET /students/{id}/edit`: form pre-filled with the stored record.
pub async fn show_edit_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError> {
    let id = parse_student_id(&raw_id)?;
    let student = state.run(move |service| service.get_student(id)).await??;

    let page = views::student_form_page(FormMode::Edit(id), &StudentForm::from(&student), None);
    Ok(page.into_response())
}

/// `POST /students/{id}/edit`.
///
/// An unknown id is a 404 before the body is looked at. A validation failure
/// re-renders the stored values; an email conflict re-renders the submitted
/// values.
pub async fn submit_edit(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Form<FormPairs>, FormRejection>,
) -> Result<Response, WebError> {
    let id = parse_student_id(&raw_id)?;
    let stored = state.run(move |service| service.get_student(id)).await??;

    let form = match body {
        Ok(Form(pairs)) => StudentForm::from_pairs(pairs),
        Err(rejection) => {
            warn!(
                "event=student_edit module=web status=rejected student_id={id} reason=bad_body"
            );
            return Ok(rejection.into_response());
        }
    };
    let submitted = form.clone();
    let result = state
        .run(move |service| service.edit_student(id, &submitted))
        .await?;

    let (shown, notice) = match result {
        Ok(student) => {
            info!(
                "event=student_edit module=web status=ok student_id={}",
                student.id
            );
            return Ok(redirect_to_list(FlashNotice::Updated));
        }
        Err(StudentServiceError::Invalid(kind)) => {
            info!(
                "event=student_edit module=web status=rejected student_id={id} reason={}",
                rejection_code(kind)
            );
            (StudentForm::from(&stored), Notice::from(kind))
        }
        Err(StudentServiceError::EmailTaken(_)) => {
            info!(
                "event=student_edit module=web status=rejected student_id={id} reason=email_taken"
            );
            (form.trimmed(), Notice::email_taken())
        }
        Err(other) => return Err(other.into()),
    };

    Ok(views::student_form_page(FormMode::Edit(id), &shown, Some(&notice)).into_response())
}

/// `POST /students/{id}/delete`: removes the record without confirmation.
pub async fn delete_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError> {
    let id = parse_student_id(&raw_id)?;
    state.run(move |service| service.delete_student(id)).await??;

    info!("event=student_delete module=web status=ok student_id={id}");
    Ok(redirect_to_list(FlashNotice::Deleted))
}

fn parse_student_id(raw: &str) -> Result<StudentId, WebError> {
    raw.parse::<StudentId>().map_err(|_| {
        warn!("event=student_lookup module=web status=rejected reason=malformed_id");
        WebError::NotFound
    })
}

// 302 Found, matching classic form-post redirects.
fn redirect_to_list(flash: FlashNotice) -> Response {
    (
        StatusCode::FOUND,
        [
            (LOCATION, STUDENT_LIST_PATH.to_string()),
            (SET_COOKIE, flash.set_cookie()),
        ],
    )
        .into_response()
}
