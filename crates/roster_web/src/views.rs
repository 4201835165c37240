//! HTML page rendering.
//!
//! Every user-supplied value passes through [`escape_html`] before it is
//! written into markup.

use crate::notice::Notice;
use axum::response::Html;
use roster_core::{Student, StudentForm, StudentId};
use std::fmt::Write;

/// Which form a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(StudentId),
}

impl FormMode {
    fn title(self) -> &'static str {
        match self {
            Self::Add => "Add Student",
            Self::Edit(_) => "Edit Student",
        }
    }

    fn action(self) -> String {
        match self {
            Self::Add => "/students/add".to_string(),
            Self::Edit(id) => format!("/students/{id}/edit"),
        }
    }
}

/// Student list in insertion order.
pub fn student_list_page(students: &[Student], notice: Option<&Notice>) -> Html<String> {
    let mut body = String::new();
    push_notice(&mut body, notice);
    body.push_str("<p><a href=\"/students/add\">Add Student</a></p>\n");

    if students.is_empty() {
        body.push_str("<p class=\"empty\">No students yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>Name</th><th>Age</th><th>Email</th><th>Actions</th></tr></thead>\n<tbody>\n",
        );
        for student in students {
            let _ = write!(
                body,
                "<tr><td>{name}</td><td>{age}</td><td>{email}</td><td>\
                 <a href=\"/students/{id}/edit\">Edit</a> \
                 <form method=\"post\" action=\"/students/{id}/delete\" class=\"inline\">\
                 <button type=\"submit\">Delete</button></form></td></tr>\n",
                id = student.id,
                name = escape_html(&student.name),
                age = student.age,
                email = escape_html(&student.email),
            );
        }
        body.push_str("</tbody>\n</table>\n");
    }

    layout("Students", &body)
}

/// Add or edit form, pre-filled with `form`.
pub fn student_form_page(
    mode: FormMode,
    form: &StudentForm,
    notice: Option<&Notice>,
) -> Html<String> {
    let mut body = String::new();
    push_notice(&mut body, notice);
    let _ = write!(
        body,
        "<form method=\"post\" action=\"{action}\">\n\
         <label>Name <input type=\"text\" name=\"name\" value=\"{name}\"></label>\n\
         <label>Age <input type=\"number\" name=\"age\" min=\"1\" value=\"{age}\"></label>\n\
         <label>Email <input type=\"email\" name=\"email\" value=\"{email}\"></label>\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n\
         <p><a href=\"/students\">Back to list</a></p>\n",
        action = mode.action(),
        name = escape_html(&form.name),
        age = escape_html(&form.age),
        email = escape_html(&form.email),
    );

    layout(mode.title(), &body)
}

pub fn not_found_page() -> Html<String> {
    layout(
        "Not Found",
        "<p>The requested student does not exist.</p>\n<p><a href=\"/students\">Back to list</a></p>\n",
    )
}

pub fn error_page() -> Html<String> {
    layout(
        "Server Error",
        "<p>Something went wrong. Please try again.</p>\n",
    )
}

fn push_notice(body: &mut String, notice: Option<&Notice>) {
    if let Some(notice) = notice {
        let _ = writeln!(
            body,
            "<div class=\"notice {}\" role=\"alert\">{}</div>",
            notice.kind.as_str(),
            escape_html(notice.text)
        );
    }
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n"
    ))
}

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}
