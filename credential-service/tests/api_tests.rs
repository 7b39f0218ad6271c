mod common;

use auth::Claims;
use chrono::Utc;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app.register("a@x.com", "secret1").await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "a@x.com");
    assert!(body["userId"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    let stored_hash = app.repository.password_hash_of("a@x.com").unwrap();
    assert!(stored_hash.starts_with("$argon2id$"));
    assert!(!body.to_string().contains(&stored_hash));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    let first = app.register("a@x.com", "secret1").await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first_hash = app.repository.password_hash_of("a@x.com").unwrap();

    let response = app.register("a@x.com", "another-secret").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "user already exists");
    assert_eq!(body["kind"], "duplicate_account");

    // The first account is untouched
    assert_eq!(app.repository.len(), 1);
    assert_eq!(app.repository.password_hash_of("a@x.com").unwrap(), first_hash);
    assert_eq!(app.login("a@x.com", "secret1").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_registrations_create_one_account() {
    let app = TestApp::spawn().await;

    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let request = app
                .post("/auth/register")
                .json(&json!({ "email": "race@x.com", "password": "secret1" }));
            tokio::spawn(async move { request.send().await.unwrap().status() })
        })
        .collect();

    let mut statuses = Vec::new();
    for attempt in attempts {
        statuses.push(attempt.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 7);
    assert_eq!(app.repository.len(), 1);
}

#[tokio::test]
async fn test_register_email_is_case_sensitive() {
    let app = TestApp::spawn().await;

    assert_eq!(app.register("a@x.com", "secret1").await.status(), StatusCode::CREATED);
    assert_eq!(app.register("A@x.com", "secret1").await.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_invalid_input_lists_violations() {
    let app = TestApp::spawn().await;

    let response = app.register("not-an-email", "123").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["kind"], "validation_error");
    assert_eq!(body["details"][0]["field"], "email");
    assert_eq!(body["details"][1]["field"], "password");
    assert_eq!(app.repository.len(), 0);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "validation_error");
    assert_eq!(app.repository.len(), 0);
}

#[tokio::test]
async fn test_register_then_login_issues_token_for_user() {
    let app = TestApp::spawn().await;

    let registered: serde_json::Value = app.register("a@x.com", "secret1").await.json().await.unwrap();

    let response = app.login("a@x.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    let token = body["token"].as_str().expect("token missing");
    assert_eq!(token.split('.').count(), 3);

    let claims: Claims = app.jwt_handler.decode(token).expect("Token rejected");
    assert_eq!(claims.sub, registered["userId"].as_str().unwrap());
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("a@x.com", "secret1").await;

    let wrong_password = app.login("a@x.com", "wrong").await;
    let unknown_email = app.login("nobody@x.com", "secret1").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let wrong_password: serde_json::Value = wrong_password.json().await.unwrap();
    let unknown_email: serde_json::Value = unknown_email.json().await.unwrap();

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["error"], "Invalid email or password");
    assert_eq!(wrong_password["kind"], "invalid_credentials");
}

#[tokio::test]
async fn test_login_empty_fields() {
    let app = TestApp::spawn().await;

    let response = app.login("", "").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "validation_error");
}

#[tokio::test]
async fn test_deleted_user_cannot_login_and_email_is_reusable() {
    let app = TestApp::spawn().await;
    app.register("a@x.com", "secret1").await;

    app.repository.soft_delete("a@x.com");

    let response = app.login("a@x.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.register("a@x.com", "secret2").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(app.login("a@x.com", "secret2").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_me_with_valid_token() {
    let app = TestApp::spawn().await;
    let registered: serde_json::Value = app.register("a@x.com", "secret1").await.json().await.unwrap();
    let login: serde_json::Value = app.login("a@x.com", "secret1").await.json().await.unwrap();

    let response = app
        .get_authenticated("/auth/me", login["token"].as_str().unwrap())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["userId"], registered["userId"]);
    assert_eq!(body["email"], "a@x.com");
}

#[tokio::test]
async fn test_me_without_token() {
    let app = TestApp::spawn().await;

    let response = app.get("/auth/me").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "token_invalid");
}

#[tokio::test]
async fn test_me_with_tampered_token() {
    let app = TestApp::spawn().await;
    app.register("a@x.com", "secret1").await;
    let login: serde_json::Value = app.login("a@x.com", "secret1").await.json().await.unwrap();

    let token = login["token"].as_str().unwrap();
    let (signed, signature) = token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { "B" } else { "A" };
    let tampered = format!("{}.{}{}", signed, flipped, &signature[1..]);

    let response = app.get_authenticated("/auth/me", &tampered).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "token_invalid");
}

#[tokio::test]
async fn test_me_with_expired_token() {
    let app = TestApp::spawn().await;
    let registered: serde_json::Value = app.register("a@x.com", "secret1").await.json().await.unwrap();

    let claims = Claims::for_subject(
        registered["userId"].as_str().unwrap(),
        chrono::Duration::hours(24),
    )
    .with_expiration(Utc::now().timestamp() - 60);
    let token = app.jwt_handler.encode(&claims).unwrap();

    let response = app.get_authenticated("/auth/me", &token).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "token_expired");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "active");
}
