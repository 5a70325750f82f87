//! Black-box tests of the HTTP surface: the register/verify/login journey,
//! the gated sections, password reset, and the error-status mapping.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use connectcargo_api::app::build_app;
use connectcargo_infra::{
    AccountService, InMemoryAccountStore, InMemorySessionStore, Mailer, RecordingMailer,
};

fn test_app() -> (Router, Arc<RecordingMailer>) {
    let mailer = RecordingMailer::arc();
    let dyn_mailer: Arc<dyn Mailer> = mailer.clone();
    let service = Arc::new(AccountService::new(
        InMemoryAccountStore::arc(),
        dyn_mailer,
        InMemorySessionStore::arc(),
        "http://localhost:8080",
    ));
    (build_app(service), mailer)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    bearer: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {session}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn register_body(email: &str, account_type: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "password": "Str0ng!Pass",
        "confirm_password": "Str0ng!Pass",
        "account_type": account_type,
        "full_name": "Jane Driver",
        "phone": "+57 300 000 0000",
    })
}

fn login_body(email: &str, password: &str) -> serde_json::Value {
    serde_json::json!({"email": email, "password": password})
}

/// Last path segment of the most recent mailed link.
fn mailed_token(mailer: &RecordingMailer) -> String {
    let mail = mailer.last().expect("a mail should have been delivered");
    mail.link.rsplit('/').next().unwrap().to_string()
}

#[tokio::test]
async fn health_answers_ok() {
    let (app, _) = test_app();
    let (status, json) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn register_verify_login_and_gated_sections() {
    let (app, mailer) = test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/auth/register",
        Some(register_body("driver1@example.com", "carrier")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["status"], "pending_verification");

    // Login before verification: active-status gate denies.
    let (status, json) = send(
        &app,
        "POST",
        "/auth/login",
        Some(login_body("driver1@example.com", "Str0ng!Pass")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "unauthorized");

    // Follow the mailed verification link.
    let token = mailed_token(&mailer);
    let (status, json) = send(
        &app,
        "GET",
        &format!("/auth/verify-email/{token}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["account"]["status"], "active");
    assert_eq!(json["account"]["email_verified"], true);

    // The link is single-use.
    let (status, json) = send(
        &app,
        "GET",
        &format!("/auth/verify-email/{token}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_token");

    // Login now succeeds and returns an opaque session.
    let (status, json) = send(
        &app,
        "POST",
        "/auth/login",
        Some(login_body("driver1@example.com", "Str0ng!Pass")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session = json["session"].as_str().unwrap().to_string();
    assert_eq!(json["account"]["role"], "carrier");

    // Carrier section opens; company section is role-gated.
    let (status, json) = send(&app, "GET", "/welcome/carrier", None, Some(&session)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["profile"]["kind"], "carrier");
    assert_eq!(json["profile"]["carrier_type"], "individual");

    let (status, _) = send(&app, "GET", "/welcome/company", None, Some(&session)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Logout invalidates the session.
    let (status, _) = send(&app, "POST", "/auth/logout", None, Some(&session)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", "/welcome/carrier", None, Some(&session)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_bad_input_with_mapped_statuses() {
    let (app, _) = test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/auth/register",
        Some(register_body("driver1@example.com", "driver")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_role");

    let mut weak = register_body("driver1@example.com", "carrier");
    weak["password"] = "weakpass".into();
    weak["confirm_password"] = "weakpass".into();
    let (status, json) = send(&app, "POST", "/auth/register", Some(weak), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "weak_password");

    let (status, json) = send(
        &app,
        "POST",
        "/auth/register",
        Some(register_body("bad-email", "carrier")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_email");

    // Duplicate registration conflicts.
    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        Some(register_body("company1@example.com", "company")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, json) = send(
        &app,
        "POST",
        "/auth/register",
        Some(register_body("Company1@Example.com", "company")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "duplicate_email");
}

#[tokio::test]
async fn login_failures_map_to_unauthorized_then_locked() {
    let (app, mailer) = test_app();
    send(
        &app,
        "POST",
        "/auth/register",
        Some(register_body("driver1@example.com", "carrier")),
        None,
    )
    .await;
    let token = mailed_token(&mailer);
    send(&app, "GET", &format!("/auth/verify-email/{token}"), None, None).await;

    for _ in 0..4 {
        let (status, json) = send(
            &app,
            "POST",
            "/auth/login",
            Some(login_body("driver1@example.com", "wrong")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "invalid_credentials");
    }

    // Fifth failure locks; the correct password is locked out too.
    let (status, json) = send(
        &app,
        "POST",
        "/auth/login",
        Some(login_body("driver1@example.com", "wrong")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(json["error"], "locked_out");

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        Some(login_body("driver1@example.com", "Str0ng!Pass")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::LOCKED);
}

#[tokio::test]
async fn check_email_reports_validity_and_existence() {
    let (app, _) = test_app();
    send(
        &app,
        "POST",
        "/auth/register",
        Some(register_body("driver1@example.com", "carrier")),
        None,
    )
    .await;

    let (status, json) = send(
        &app,
        "GET",
        "/auth/check-email?email=driver1@example.com",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], true);
    assert_eq!(json["exists"], true);

    let (_, json) = send(
        &app,
        "GET",
        "/auth/check-email?email=fresh@example.com",
        None,
        None,
    )
    .await;
    assert_eq!(json["exists"], false);

    let (_, json) = send(&app, "GET", "/auth/check-email?email=nope", None, None).await;
    assert_eq!(json["valid"], false);

    let (_, json) = send(&app, "GET", "/auth/check-email", None, None).await;
    assert_eq!(json["valid"], false);
}

#[tokio::test]
async fn forgot_and_reset_password_flow() {
    let (app, mailer) = test_app();
    send(
        &app,
        "POST",
        "/auth/register",
        Some(register_body("driver1@example.com", "carrier")),
        None,
    )
    .await;
    let token = mailed_token(&mailer);
    send(&app, "GET", &format!("/auth/verify-email/{token}"), None, None).await;

    // The response is uniform whether or not the account exists.
    let (status, json) = send(
        &app,
        "POST",
        "/auth/forgot-password",
        Some(serde_json::json!({"email": "driver1@example.com"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let uniform = json["message"].clone();

    let reset_token = mailed_token(&mailer);
    let (status, json) = send(
        &app,
        "POST",
        "/auth/forgot-password",
        Some(serde_json::json!({"email": "nobody@example.com"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["message"], uniform);

    // The mailed link is still good (pre-flight check does not consume it).
    let (status, json) = send(
        &app,
        "GET",
        &format!("/auth/reset-password/{reset_token}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], true);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/reset-password",
        Some(serde_json::json!({
            "token": reset_token,
            "password": "N3w!Secret",
            "confirm_password": "N3w!Secret",
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        Some(login_body("driver1@example.com", "Str0ng!Pass")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        Some(login_body("driver1@example.com", "N3w!Secret")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The consumed link is dead for both the pre-flight and a second reset.
    let (status, json) = send(
        &app,
        "GET",
        &format!("/auth/reset-password/{reset_token}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_token");
}
