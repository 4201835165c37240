use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use roster_core::db::open_db_in_memory;
use roster_core::{Student, StudentForm};
use roster_web::{create_router, AppState};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: AppState,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState::new(open_db_in_memory().unwrap());
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    fn seed(&self, name: &str, age: &str, email: &str) -> Student {
        self.state
            .with_service(|service| service.add_student(&StudentForm::new(name, age, email)))
            .unwrap()
            .unwrap()
    }

    fn students(&self) -> Vec<Student> {
        self.state
            .with_service(|service| service.list_students())
            .unwrap()
            .unwrap()
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn get_with_cookie(&self, uri: &str, cookie: &str) -> TestResponse {
        self.send(
            Request::builder()
                .uri(uri)
                .header(COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn post_raw(&self, uri: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn post_form(&self, uri: &str, body: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

impl TestResponse {
    fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    // `name=value` part of the first Set-Cookie header.
    fn cookie_pair(&self) -> String {
        self.headers
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .unwrap()
            .to_string()
    }
}

#[tokio::test]
async fn list_shows_all_students() {
    let app = TestApp::new();
    app.seed("Alice", "20", "alice@example.com");
    app.seed("Bob", "22", "bob@example.com");

    let response = app.get("/students").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Alice"));
    assert!(response.body.contains("Bob"));
    assert!(response.body.find("Alice").unwrap() < response.body.find("Bob").unwrap());
}

#[tokio::test]
async fn root_redirects_to_list_and_health_answers() {
    let app = TestApp::new();

    let root = app.get("/").await;
    assert!(root.status.is_redirection());
    assert_eq!(root.location(), Some("/students"));

    let health = app.get("/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert!(health.body.starts_with("pong"));
}

#[tokio::test]
async fn add_get_renders_empty_form() {
    let app = TestApp::new();

    let response = app.get("/students/add").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Add Student"));
    assert!(response.body.contains("name=\"name\" value=\"\""));
}

#[tokio::test]
async fn add_valid_post_redirects_and_flashes_once() {
    let app = TestApp::new();

    let response = app
        .post_form("/students/add", "name=Charlie&age=25&email=charlie%40example.com")
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/students"));
    let students = app.students();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].name, "Charlie");
    assert_eq!(students[0].age, 25);
    assert_eq!(students[0].email, "charlie@example.com");

    let cookie = response.cookie_pair();
    let list = app.get_with_cookie("/students", &cookie).await;
    assert!(list.body.contains("Student added successfully!"));
    assert!(list.cookie_pair().ends_with('='), "flash cookie should be cleared");

    let again = app.get("/students").await;
    assert!(!again.body.contains("Student added successfully!"));
}

#[tokio::test]
async fn add_rejections_rerender_form_without_writing() {
    let app = TestApp::new();
    let cases = [
        ("name=&age=&email=", "All fields are required."),
        ("name=Bob", "All fields are required."),
        ("name=David&age=-5&email=david%40example.com", "Age must be a positive number."),
        ("name=David&age=abc&email=david%40example.com", "Age must be a positive number."),
        ("name=Eve&age=30&email=not-an-email", "Please enter a valid email address."),
    ];

    for (body, message) in cases {
        let response = app.post_form("/students/add", body).await;
        assert_eq!(response.status, StatusCode::OK, "{body}");
        assert!(response.body.contains(message), "{body} should show {message}");
        assert!(response.headers.get(SET_COOKIE).is_none());
    }

    assert!(app.students().is_empty());
}

#[tokio::test]
async fn add_does_not_preserve_entered_values() {
    let app = TestApp::new();

    let response = app
        .post_form("/students/add", "name=Eve&age=30&email=invalid-email")
        .await;

    assert!(!response.body.contains("value=\"Eve\""));
    assert!(!response.body.contains("invalid-email"));
}

#[tokio::test]
async fn add_duplicate_email_reports_conflict() {
    let app = TestApp::new();
    app.seed("Alice", "22", "alice@example.com");

    let response = app
        .post_form("/students/add", "name=Other&age=30&email=alice%40example.com")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .body
        .contains("Email already exists. Please use a different one."));
    assert_eq!(app.students().len(), 1);
}

#[tokio::test]
async fn edit_get_prefills_stored_values() {
    let app = TestApp::new();
    let frank = app.seed("Frank", "26", "frank@example.com");

    let response = app.get(&format!("/students/{}/edit", frank.id)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Edit Student"));
    assert!(response.body.contains("value=\"Frank\""));
    assert!(response.body.contains("value=\"26\""));
    assert!(response.body.contains("value=\"frank@example.com\""));
}

#[tokio::test]
async fn edit_and_delete_unknown_or_malformed_ids_are_not_found() {
    let app = TestApp::new();

    assert_eq!(app.get("/students/999/edit").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/students/abc/edit").await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.post_form("/students/999/edit", "name=&age=&email=")
            .await
            .status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.post_form("/students/999/delete", "").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn edit_unknown_id_is_not_found_before_body_is_read() {
    let app = TestApp::new();
    let kim = app.seed("Kim", "31", "kim@example.com");

    assert_eq!(
        app.post_raw("/students/999/edit").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.post_raw(&format!("/students/{}/edit", kim.id)).await.status,
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    );
    assert_eq!(app.students(), vec![kim]);
}

#[tokio::test]
async fn repeated_form_field_uses_last_value() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/students/add",
            "name=First&name=Second&age=40&email=second%40example.com",
        )
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(app.students()[0].name, "Second");
}

#[tokio::test]
async fn internationalized_email_is_accepted() {
    let app = TestApp::new();

    let response = app
        .post_form("/students/add", "name=Ana&age=20&email=ana%40b%C3%BCcher.example")
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(app.students()[0].email, "ana@bücher.example");
}

#[tokio::test]
async fn edit_valid_post_updates_and_redirects() {
    let app = TestApp::new();
    let george = app.seed("George", "24", "george@example.com");

    let response = app
        .post_form(
            &format!("/students/{}/edit", george.id),
            "name=GeorgeUpdated&age=25&email=george_updated%40example.com",
        )
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/students"));
    let list = app
        .get_with_cookie("/students", &response.cookie_pair())
        .await;
    assert!(list.body.contains("Student updated successfully!"));

    let updated = &app.students()[0];
    assert_eq!(updated.id, george.id);
    assert_eq!(updated.name, "GeorgeUpdated");
    assert_eq!(updated.age, 25);
    assert_eq!(updated.email, "george_updated@example.com");
}

#[tokio::test]
async fn edit_invalid_post_shows_stored_values_and_keeps_record() {
    let app = TestApp::new();
    let ian = app.seed("Ian", "20", "ian@example.com");

    let response = app
        .post_form(
            &format!("/students/{}/edit", ian.id),
            "name=Ian+Changed&age=-1&email=ian%40example.com",
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Age must be a positive number."));
    assert!(response.body.contains("value=\"Ian\""));
    assert_eq!(app.students(), vec![ian]);
}

#[tokio::test]
async fn edit_to_email_of_other_student_is_rejected() {
    let app = TestApp::new();
    let alice = app.seed("Alice", "22", "alice@example.com");
    let john = app.seed("John", "20", "john@example.com");

    let response = app
        .post_form(
            &format!("/students/{}/edit", john.id),
            "name=John&age=21&email=alice%40example.com",
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .body
        .contains("Email already exists. Please use a different one."));
    assert!(response.body.contains("value=\"21\""));
    assert_eq!(app.students(), vec![alice, john]);
}

#[tokio::test]
async fn delete_removes_student_and_flashes() {
    let app = TestApp::new();
    let hannah = app.seed("Hannah", "23", "hannah@example.com");

    let response = app
        .post_form(&format!("/students/{}/delete", hannah.id), "")
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/students"));
    assert!(app.students().is_empty());

    let list = app
        .get_with_cookie("/students", &response.cookie_pair())
        .await;
    assert!(list.body.contains("Student deleted successfully!"));
    assert!(!list.body.contains("hannah@example.com"));
}

#[tokio::test]
async fn delete_is_post_only() {
    let app = TestApp::new();
    let hannah = app.seed("Hannah", "23", "hannah@example.com");

    let response = app.get(&format!("/students/{}/delete", hannah.id)).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(app.students().len(), 1);
}
